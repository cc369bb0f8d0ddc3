//! Ship, cargo and report logic lives here.

pub mod app_state;
pub mod auth;
pub mod catalog;
pub mod form;
pub mod mappers;
pub mod reports;
pub mod schema;
pub mod ship;
pub mod users;

#[allow(unused_imports)]
pub use app_state::{AppState, PartyFilters, PersistedState, ReportFilters};
#[allow(unused_imports)]
pub use auth::{LoginForm, Session, TokenClaims};
#[allow(unused_imports)]
pub use form::{
    CargaisonForm, CargaisonType, ContactRole, PartyMode, ShipForm, ShipFormKind, ShipFormLayout,
};
#[allow(unused_imports)]
pub use mappers::{fleet_to_ship, ship_dto_to_form, ship_form_to_dto};
#[allow(unused_imports)]
pub use schema::{ShipSchema, ValidationErrors};
#[allow(unused_imports)]
pub use ship::{DocumentKind, EntityId, ShipDto, ShipSubmission, UploadFile};
#[allow(unused_imports)]
pub use users::{RoleDto, UserDto, UserForm, UserFormMode};
