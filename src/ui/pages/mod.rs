pub mod fleets_report;
pub mod login;
pub mod report;
pub mod report_parties;
pub mod ship_form;
pub mod users;

pub use fleets_report::FleetsReportPage;
pub use login::LoginPage;
pub use report::ReportPage;
pub use ship_form::{ShipFormPage, UpdateShipPage};
pub use users::UsersPage;
