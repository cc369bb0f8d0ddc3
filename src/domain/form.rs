//! Editable, nested form state for the ship forms.

use time::OffsetDateTime;

use super::schema::{validate_cargaison, ValidationErrors};
use super::ship::{
    DocumentKind, EntityId, FournisseurSummaryDto, ReceiverSummaryDto, UploadFile,
};

pub const DEFAULT_AGENT: &str = "NAVLION";
const AGENT_SHIP_AGENT: &str = "navlion";

/// Which create form is being filled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipFormKind {
    Ours,
    Agent,
    Fleet,
}

impl ShipFormKind {
    /// Agent and fleet ships are stored as fleet ships and use the relaxed schema.
    pub fn is_fleet(&self) -> bool {
        !matches!(self, ShipFormKind::Ours)
    }

    /// Berthing/completion dates, status and provenance are hidden on the fleet form.
    pub fn shows_schedule(&self) -> bool {
        !matches!(self, ShipFormKind::Fleet)
    }

    pub fn has_cargoes(&self) -> bool {
        !matches!(self, ShipFormKind::Fleet)
    }

    pub fn has_performance_rate(&self) -> bool {
        !matches!(self, ShipFormKind::Fleet)
    }

    pub fn shows_agent(&self) -> bool {
        matches!(self, ShipFormKind::Agent)
    }

    pub fn default_agent(&self) -> &'static str {
        match self {
            ShipFormKind::Ours => DEFAULT_AGENT,
            ShipFormKind::Agent => AGENT_SHIP_AGENT,
            ShipFormKind::Fleet => "",
        }
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            ShipFormKind::Ours => "common.addOurShip",
            ShipFormKind::Agent => "common.addAgentShip",
            ShipFormKind::Fleet => "common.addFleet",
        }
    }

    pub fn created_message(&self) -> &'static str {
        match self {
            ShipFormKind::Ours | ShipFormKind::Agent => "Ship added successfully",
            ShipFormKind::Fleet => "Fleet ship has been successfully added",
        }
    }
}

/// Which optional sections a ship form shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShipFormLayout {
    pub schedule: bool,
    pub cargoes: bool,
    pub performance_rate: bool,
    pub agent: bool,
}

impl ShipFormLayout {
    pub fn for_kind(kind: ShipFormKind) -> Self {
        Self {
            schedule: kind.shows_schedule(),
            cargoes: kind.has_cargoes(),
            performance_rate: kind.has_performance_rate(),
            agent: kind.shows_agent(),
        }
    }

    /// Editing shows every section; the agent only when the ship has one.
    pub fn for_update(form: &ShipForm) -> Self {
        Self {
            schedule: true,
            cargoes: true,
            performance_rate: true,
            agent: !form.add_ship.agent.trim().is_empty(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CargaisonType {
    Cargaison,
    Container,
}

impl CargaisonType {
    pub const ALL: [CargaisonType; 2] = [CargaisonType::Container, CargaisonType::Cargaison];

    pub fn as_str(&self) -> &'static str {
        match self {
            CargaisonType::Cargaison => "cargaison",
            CargaisonType::Container => "container",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CargaisonType::Cargaison => "Cargaison",
            CargaisonType::Container => "container",
        }
    }

    /// Anything but `container` is read back as a cargaison.
    pub fn from_wire(value: &str) -> Self {
        if value == "container" {
            CargaisonType::Container
        } else {
            CargaisonType::Cargaison
        }
    }
}

/// Whether a cargo's receiver (or fournisseur) is picked from the backend list
/// or typed in as a new party.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PartyMode {
    Existing,
    #[default]
    New,
}

impl PartyMode {
    pub fn for_id(id: Option<&EntityId>) -> Self {
        if id.is_some() {
            PartyMode::Existing
        } else {
            PartyMode::New
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShipDetailsForm {
    pub ship_name: String,
    pub ship_imo: String,
    pub dwt: String,
    pub ship_type: String,
    pub boarding_port: String,
    pub berthing_date: Option<OffsetDateTime>,
    pub completion_date: Option<OffsetDateTime>,
    pub ship_status: String,
    pub provenance: String,
    pub agent: String,
}

impl ShipDetailsForm {
    fn new(agent: &str) -> Self {
        Self {
            ship_name: String::new(),
            ship_imo: String::new(),
            dwt: String::new(),
            ship_type: String::new(),
            boarding_port: String::new(),
            berthing_date: Some(OffsetDateTime::now_utc()),
            completion_date: None,
            ship_status: String::new(),
            provenance: String::new(),
            agent: agent.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonnelContactForm {
    pub name: String,
    pub phone_number: String,
    pub whats_app_number: String,
    pub wechat_number: String,
}

impl PersonnelContactForm {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.phone_number.is_empty()
            && self.whats_app_number.is_empty()
            && self.wechat_number.is_empty()
    }
}

/// Which of the three contact cards a field belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactRole {
    ShipOwner,
    OperationDepart,
    ChartingDepart,
}

impl ContactRole {
    pub const ALL: [ContactRole; 3] = [
        ContactRole::ShipOwner,
        ContactRole::OperationDepart,
        ContactRole::ChartingDepart,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            ContactRole::ShipOwner => "shipOwner",
            ContactRole::OperationDepart => "operationDepart",
            ContactRole::ChartingDepart => "chartingDepart",
        }
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            ContactRole::ShipOwner => "common.shipowner",
            ContactRole::OperationDepart => "common.operationDepart",
            ContactRole::ChartingDepart => "common.chartingDepart",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CargaisonForm {
    /// Backend id, kept so updates edit the existing cargo.
    pub id: Option<EntityId>,
    /// `None` until the user picks a type.
    pub kind: Option<CargaisonType>,
    pub category: String,
    pub sub_category: String,
    pub tonnage: String,

    pub receiver_mode: PartyMode,
    pub receiver_id: Option<EntityId>,
    pub receiver_mic: String,
    pub receiver_name: String,
    pub receiver_email: String,
    pub receiver_phone_fixe: String,
    pub receiver_phone_mobile: String,

    pub fournisseur_mode: PartyMode,
    pub fournisseur_id: Option<EntityId>,
    pub fournisseur_mic: String,
    pub fournisseur_name: String,
    pub fournisseur_email: String,
    pub fournisseur_phone_fixe: String,
    pub fournisseur_phone_mobile: String,

    pub phone_number: String,
    pub whats_app_number: String,
    pub email: String,
}

impl CargaisonForm {
    pub fn select_existing_receiver(&mut self, receiver: &ReceiverSummaryDto) {
        self.receiver_id = Some(receiver.receiver_id.clone());
        self.receiver_name = receiver.receiver_name.clone();
        self.receiver_email = receiver.receiver_email.clone().unwrap_or_default();
        self.receiver_phone_mobile = receiver.receiver_phone_mobile.clone().unwrap_or_default();
        // Summaries carry no MIC.
        self.receiver_mic.clear();
    }

    pub fn clear_receiver(&mut self) {
        self.receiver_id = None;
        self.receiver_name.clear();
        self.receiver_email.clear();
        self.receiver_phone_mobile.clear();
        self.receiver_mic.clear();
    }

    pub fn select_existing_fournisseur(&mut self, fournisseur: &FournisseurSummaryDto) {
        self.fournisseur_id = Some(fournisseur.fournisseur_id.clone());
        self.fournisseur_name = fournisseur.fournisseur_name.clone();
        self.fournisseur_email = fournisseur.fournisseur_email.clone().unwrap_or_default();
        self.fournisseur_phone_fixe = fournisseur.fournisseur_phone_fixe.clone().unwrap_or_default();
        self.fournisseur_phone_mobile =
            fournisseur.fournisseur_phone_mobile.clone().unwrap_or_default();
        self.fournisseur_mic.clear();
    }

    pub fn clear_fournisseur(&mut self) {
        self.fournisseur_id = None;
        self.fournisseur_name.clear();
        self.fournisseur_email.clear();
        self.fournisseur_phone_fixe.clear();
        self.fournisseur_phone_mobile.clear();
        self.fournisseur_mic.clear();
    }

    /// Switching between picking and typing a receiver starts from blank fields.
    pub fn set_receiver_mode(&mut self, mode: PartyMode) {
        self.receiver_mode = mode;
        self.clear_receiver();
    }

    pub fn set_fournisseur_mode(&mut self, mode: PartyMode) {
        self.fournisseur_mode = mode;
        self.clear_fournisseur();
    }

    /// Changing the category invalidates the chosen sub-category.
    pub fn set_category(&mut self, category: String) {
        if category != self.category {
            self.sub_category.clear();
        }
        self.category = category;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentsForm {
    pub ship: Vec<UploadFile>,
    pub charter: Vec<UploadFile>,
    pub receiver: Vec<UploadFile>,
}

impl DocumentsForm {
    pub fn get(&self, kind: DocumentKind) -> &[UploadFile] {
        match kind {
            DocumentKind::Ship => &self.ship,
            DocumentKind::Charter => &self.charter,
            DocumentKind::Receiver => &self.receiver,
        }
    }

    pub fn set(&mut self, kind: DocumentKind, files: Vec<UploadFile>) {
        match kind {
            DocumentKind::Ship => self.ship = files,
            DocumentKind::Charter => self.charter = files,
            DocumentKind::Receiver => self.receiver = files,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DocumentKind, &[UploadFile])> {
        DocumentKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShipForm {
    pub add_ship: ShipDetailsForm,
    pub cargoes: Vec<CargaisonForm>,
    pub ship_owner: PersonnelContactForm,
    pub operation_depart: PersonnelContactForm,
    pub charting_depart: PersonnelContactForm,
    pub documents: DocumentsForm,
    /// Existing document ids shown as previews in update mode.
    pub ship_documents: Vec<EntityId>,
    pub charter_documents: Vec<EntityId>,
    pub receiver_documents: Vec<EntityId>,
    pub remarks_and_facts: String,
    pub performance_rate: String,
}

impl Default for ShipForm {
    fn default() -> Self {
        Self::new(ShipFormKind::Ours)
    }
}

impl ShipForm {
    pub fn new(kind: ShipFormKind) -> Self {
        Self {
            add_ship: ShipDetailsForm::new(kind.default_agent()),
            cargoes: Vec::new(),
            ship_owner: PersonnelContactForm::default(),
            operation_depart: PersonnelContactForm::default(),
            charting_depart: PersonnelContactForm::default(),
            documents: DocumentsForm::default(),
            ship_documents: Vec::new(),
            charter_documents: Vec::new(),
            receiver_documents: Vec::new(),
            remarks_and_facts: String::new(),
            performance_rate: String::new(),
        }
    }

    pub fn contact(&self, role: ContactRole) -> &PersonnelContactForm {
        match role {
            ContactRole::ShipOwner => &self.ship_owner,
            ContactRole::OperationDepart => &self.operation_depart,
            ContactRole::ChartingDepart => &self.charting_depart,
        }
    }

    pub fn contact_mut(&mut self, role: ContactRole) -> &mut PersonnelContactForm {
        match role {
            ContactRole::ShipOwner => &mut self.ship_owner,
            ContactRole::OperationDepart => &mut self.operation_depart,
            ContactRole::ChartingDepart => &mut self.charting_depart,
        }
    }

    pub fn existing_documents(&self, kind: DocumentKind) -> &[EntityId] {
        match kind {
            DocumentKind::Ship => &self.ship_documents,
            DocumentKind::Charter => &self.charter_documents,
            DocumentKind::Receiver => &self.receiver_documents,
        }
    }

    /// Drops a deleted document id from the preview lists.
    pub fn forget_document(&mut self, id: &str) {
        self.ship_documents.retain(|doc| doc != id);
        self.charter_documents.retain(|doc| doc != id);
        self.receiver_documents.retain(|doc| doc != id);
    }

    /// Prepends an empty cargo, refusing while any existing cargo is invalid.
    pub fn add_cargo(&mut self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (index, cargo) in self.cargoes.iter().enumerate() {
            errors.extend_prefixed(&format!("cargoes.{index}"), validate_cargaison(cargo));
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        self.cargoes.insert(0, CargaisonForm::default());
        Ok(())
    }

    pub fn set_cargo_category(&mut self, index: usize, category: String) {
        if let Some(cargo) = self.cargoes.get_mut(index) {
            cargo.set_category(category);
        }
    }

    pub fn remove_cargo(&mut self, index: usize) {
        if index < self.cargoes.len() {
            self.cargoes.remove(index);
        }
    }

    pub fn is_dirty(&self, initial: &ShipForm) -> bool {
        self != initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_cargo() -> CargaisonForm {
        CargaisonForm {
            kind: Some(CargaisonType::Container),
            category: "Food".into(),
            sub_category: "Sugar".into(),
            tonnage: "300".into(),
            ..CargaisonForm::default()
        }
    }

    #[test]
    fn defaults_depend_on_form_kind() {
        let ours = ShipForm::new(ShipFormKind::Ours);
        assert_eq!(ours.add_ship.agent, "NAVLION");
        assert!(ours.add_ship.berthing_date.is_some());
        assert!(ours.cargoes.is_empty());

        assert_eq!(ShipForm::new(ShipFormKind::Agent).add_ship.agent, "navlion");
        assert_eq!(ShipForm::new(ShipFormKind::Fleet).add_ship.agent, "");
    }

    #[test]
    fn kind_flags() {
        assert!(!ShipFormKind::Ours.is_fleet());
        assert!(ShipFormKind::Agent.is_fleet());
        assert!(ShipFormKind::Agent.shows_schedule());
        assert!(!ShipFormKind::Fleet.shows_schedule());
        assert!(!ShipFormKind::Fleet.has_cargoes());
    }

    #[test]
    fn layout_follows_kind_and_update_data() {
        let fleet = ShipFormLayout::for_kind(ShipFormKind::Fleet);
        assert!(!fleet.schedule && !fleet.cargoes && !fleet.performance_rate && !fleet.agent);
        assert!(ShipFormLayout::for_kind(ShipFormKind::Agent).agent);

        let mut form = ShipForm::new(ShipFormKind::Fleet);
        assert!(!ShipFormLayout::for_update(&form).agent);
        form.add_ship.agent = "Sea Lines".into();
        let update = ShipFormLayout::for_update(&form);
        assert!(update.schedule && update.cargoes && update.agent);
    }

    #[test]
    fn add_cargo_prepends_when_existing_are_valid() {
        let mut form = ShipForm::default();
        form.add_cargo().unwrap();
        assert_eq!(form.cargoes.len(), 1);

        form.cargoes[0] = valid_cargo();
        form.add_cargo().unwrap();
        assert_eq!(form.cargoes.len(), 2);
        assert_eq!(form.cargoes[0], CargaisonForm::default());
        assert_eq!(form.cargoes[1].category, "Food");
    }

    #[test]
    fn add_cargo_rejects_invalid_entries() {
        let mut form = ShipForm::default();
        form.cargoes.push(valid_cargo());
        form.cargoes.push(CargaisonForm {
            kind: Some(CargaisonType::Cargaison),
            ..CargaisonForm::default()
        });

        let errors = form.add_cargo().unwrap_err();
        assert_eq!(form.cargoes.len(), 2);
        assert!(errors.for_path("cargoes.1.category").is_some());
        assert!(errors.for_path("cargoes.0.category").is_none());
    }

    #[test]
    fn changing_category_clears_sub_category() {
        let mut cargo = valid_cargo();
        cargo.set_category("Food".into());
        assert_eq!(cargo.sub_category, "Sugar");
        cargo.set_category("Cereals".into());
        assert_eq!(cargo.sub_category, "");
    }

    #[test]
    fn selecting_existing_receiver_fills_contact_fields() {
        let mut cargo = valid_cargo();
        cargo.receiver_mic = "typed".into();
        cargo.select_existing_receiver(&ReceiverSummaryDto {
            receiver_id: "r-1".into(),
            receiver_name: "Sahel Import".into(),
            receiver_email: Some("ops@sahel.mr".into()),
            receiver_phone_mobile: None,
            ..ReceiverSummaryDto::default()
        });
        assert_eq!(cargo.receiver_id.as_deref(), Some("r-1"));
        assert_eq!(cargo.receiver_name, "Sahel Import");
        assert_eq!(cargo.receiver_email, "ops@sahel.mr");
        assert_eq!(cargo.receiver_phone_mobile, "");
        assert_eq!(cargo.receiver_mic, "");

        cargo.clear_receiver();
        assert!(cargo.receiver_id.is_none());
        assert_eq!(cargo.receiver_name, "");
    }

    #[test]
    fn switching_party_mode_clears_the_party() {
        let mut cargo = valid_cargo();
        cargo.fournisseur_name = "Typed Trading".into();
        cargo.fournisseur_email = "sales@typed.mr".into();
        cargo.set_fournisseur_mode(PartyMode::Existing);
        assert_eq!(cargo.fournisseur_mode, PartyMode::Existing);
        assert_eq!(cargo.fournisseur_name, "");
        assert_eq!(cargo.fournisseur_email, "");

        cargo.set_receiver_mode(PartyMode::New);
        assert!(cargo.receiver_id.is_none());
    }

    #[test]
    fn forget_document_removes_from_every_list() {
        let mut form = ShipForm::default();
        form.ship_documents = vec!["a".into(), "b".into()];
        form.receiver_documents = vec!["b".into()];
        form.forget_document("b");
        assert_eq!(form.ship_documents, vec!["a".to_string()]);
        assert!(form.receiver_documents.is_empty());
    }

    #[test]
    fn deleted_stored_document_leaves_form_clean_when_initial_forgets_it_too() {
        let mut initial = ShipForm::default();
        initial.charter_documents = vec!["doc-1".into(), "doc-2".into()];
        let mut form = initial.clone();

        form.forget_document("doc-1");
        assert!(form.is_dirty(&initial));

        initial.forget_document("doc-1");
        assert!(!form.is_dirty(&initial));
        assert_eq!(form.charter_documents, vec!["doc-2".to_string()]);
    }

    #[test]
    fn dirty_tracking_compares_with_initial_state() {
        let initial = ShipForm::default();
        let mut form = initial.clone();
        assert!(!form.is_dirty(&initial));
        form.add_ship.ship_name = "Atlantic Star".into();
        assert!(form.is_dirty(&initial));
    }
}
