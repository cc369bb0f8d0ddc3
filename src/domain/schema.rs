//! Declarative validation rules for the ship, login and user forms.
//!
//! Errors are collected per field under dotted paths (`addShip.shipImo`,
//! `cargoes.0.category`, `documents.ship.2`) so the UI can show each message
//! next to the offending input.

use uuid::Uuid;

use super::auth::LoginForm;
use super::form::{CargaisonForm, ContactRole, PersonnelContactForm, ShipForm};
use super::ship::{DocumentKind, UploadFile};
use super::users::{UserForm, UserFormMode, UserRequest};

pub const IMO_LENGTH: usize = 7;
pub const MAX_UPLOADED_FILES: usize = 7;
pub const FILE_SIZE_LIMIT_MB: u64 = 2;
pub const FILE_SIZE_LIMIT_BYTES: u64 = FILE_SIZE_LIMIT_MB * 1024 * 1024;
pub const ALLOWED_FILE_MIME_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/svg+xml",
    "application/pdf",
];

const DATE_FORMAT_MESSAGE: &str = "date must follow the format YYYY-MM-DD";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First message recorded for `path`.
    pub fn for_path(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.path == path)
            .map(|error| error.message.as_str())
    }

    /// True when any error sits at or below `prefix`.
    pub fn has_under(&self, prefix: &str) -> bool {
        self.errors.iter().any(|error| Self::is_under(&error.path, prefix))
    }

    fn is_under(path: &str, prefix: &str) -> bool {
        path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('.'))
    }

    /// Swaps the errors at or below `prefix` for `fresh`, keeping the rest.
    pub fn replace_under(&mut self, prefix: &str, fresh: ValidationErrors) {
        self.errors.retain(|error| !Self::is_under(&error.path, prefix));
        self.errors.extend(fresh.errors);
    }

    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for error in other.errors {
            self.push(format!("{prefix}.{}", error.path), error.message);
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = self
            .errors
            .iter()
            .map(|error| format!("{}: {}", error.path, error.message))
            .collect::<Vec<_>>();
        write!(f, "{}", parts.join("; "))
    }
}

fn min_len_message(min: usize) -> String {
    format!("String must contain at least {min} character(s)")
}

fn max_len_message(max: usize) -> String {
    format!("String must contain at most {max} character(s)")
}

fn require_min(errors: &mut ValidationErrors, path: &str, value: &str, min: usize) {
    if value.chars().count() < min {
        errors.push(path, min_len_message(min));
    }
}

fn require_email_or_empty(errors: &mut ValidationErrors, path: &str, value: &str) {
    if !value.is_empty() && !is_valid_email(value) {
        errors.push(path, "Invalid email");
    }
}

/// Loose structural email check: `local@domain.tld`, no whitespace.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || local.starts_with('.') || local.ends_with('.') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
        && labels.last().is_some_and(|tld| tld.chars().count() >= 2)
}

/// Rules for the nested ship form; the fleet variant relaxes the schedule fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShipSchema {
    fleet: bool,
}

impl ShipSchema {
    pub fn for_fleet(is_fleet: bool) -> Self {
        Self { fleet: is_fleet }
    }

    pub fn is_fleet(&self) -> bool {
        self.fleet
    }

    pub fn validate(&self, form: &ShipForm) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        self.validate_details(form, &mut errors);

        for (index, cargo) in form.cargoes.iter().enumerate() {
            errors.extend_prefixed(&format!("cargoes.{index}"), validate_cargaison(cargo));
        }

        for role in ContactRole::ALL {
            errors.extend_prefixed(role.path(), validate_contact(form.contact(role)));
        }

        for (kind, files) in form.documents.iter() {
            errors.extend_prefixed(
                &format!("documents.{}", kind.form_key()),
                validate_documents(files),
            );
        }

        errors.into_result()
    }

    fn validate_details(&self, form: &ShipForm, errors: &mut ValidationErrors) {
        let details = &form.add_ship;
        require_min(errors, "addShip.shipName", &details.ship_name, 1);
        require_min(errors, "addShip.shipImo", &details.ship_imo, IMO_LENGTH);
        if details.ship_imo.chars().count() > IMO_LENGTH {
            errors.push("addShip.shipImo", max_len_message(IMO_LENGTH));
        }
        require_min(errors, "addShip.dwt", &details.dwt, 1);
        require_min(errors, "addShip.boardingPort", &details.boarding_port, 1);

        if self.fleet {
            return;
        }
        if details.berthing_date.is_none() {
            errors.push("addShip.berthingDate", DATE_FORMAT_MESSAGE);
        }
        require_min(errors, "addShip.shipStatus", &details.ship_status, 1);
        require_min(errors, "addShip.provenance", &details.provenance, 1);
    }
}

/// Validates one cargo entry; paths are relative to the cargo.
pub fn validate_cargaison(cargo: &CargaisonForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if let Some(id) = &cargo.id {
        if Uuid::parse_str(id).is_err() {
            errors.push("id", "Invalid uuid");
        }
    }
    if cargo.kind.is_none() {
        errors.push(
            "type",
            "Invalid enum value. Expected 'cargaison' | 'container', received ''",
        );
    }
    require_min(&mut errors, "category", &cargo.category, 1);
    require_min(&mut errors, "subCategory", &cargo.sub_category, 1);
    require_email_or_empty(&mut errors, "receiverEmail", &cargo.receiver_email);
    require_email_or_empty(&mut errors, "fournisseurEmail", &cargo.fournisseur_email);
    require_email_or_empty(&mut errors, "email", &cargo.email);
    errors
}

pub fn validate_contact(contact: &PersonnelContactForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if contact.name.is_empty() {
        errors.push("name", "Name is required");
    }
    errors
}

pub fn allowed_types_label() -> String {
    ALLOWED_FILE_MIME_TYPES
        .iter()
        .filter_map(|mime| mime.split('/').nth(1))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn validate_document(file: &UploadFile) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if !ALLOWED_FILE_MIME_TYPES.contains(&file.mime.as_str()) {
        errors.push(
            "",
            format!("Invalid file type. Allowed types: {}", allowed_types_label()),
        );
    }
    if file.size() > FILE_SIZE_LIMIT_BYTES {
        errors.push(
            "",
            format!("File size should not exceed {FILE_SIZE_LIMIT_MB}MB"),
        );
    }
    errors
}

/// Validates the files selected for one document kind. Per-file paths are the file
/// index, the list-level error sits under `$`.
pub fn validate_documents(files: &[UploadFile]) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if files.len() > MAX_UPLOADED_FILES {
        errors.push(
            "$",
            format!("Array must contain at most {MAX_UPLOADED_FILES} element(s)"),
        );
    }
    for (index, file) in files.iter().enumerate() {
        for error in validate_document(file).errors {
            errors.push(index.to_string(), error.message);
        }
    }
    errors
}

/// Document errors for one kind, flattened for display under the file input.
pub fn document_messages(errors: &ValidationErrors, kind: DocumentKind) -> Vec<String> {
    let prefix = format!("documents.{}", kind.form_key());
    errors
        .iter()
        .filter(|error| error.path.starts_with(&prefix))
        .map(|error| error.message.clone())
        .collect()
}

pub fn validate_login(form: &LoginForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if !is_valid_email(&form.email) {
        errors.push("email", "Invalid email");
    }
    require_min(&mut errors, "password", &form.password, 1);
    errors.into_result()
}

/// Validates the user form and builds the request body. Updates drop an empty password.
pub fn validate_user(form: &UserForm, mode: UserFormMode) -> Result<UserRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    require_min(&mut errors, "firstName", &form.first_name, 1);
    require_min(&mut errors, "lastName", &form.last_name, 1);
    if !is_valid_email(&form.email) {
        errors.push("email", "Invalid email");
    }
    let password = match mode {
        UserFormMode::Create => {
            require_min(&mut errors, "password", &form.password, 1);
            Some(form.password.clone())
        }
        UserFormMode::Update if form.password.is_empty() => None,
        UserFormMode::Update => Some(form.password.clone()),
    };
    if Uuid::parse_str(&form.role_id).is_err() {
        errors.push("roleId", "Invalid uuid");
    }
    errors.into_result()?;

    Ok(UserRequest {
        first_name: form.first_name.clone(),
        last_name: form.last_name.clone(),
        email: form.email.clone(),
        password,
        role_id: form.role_id.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::{CargaisonType, ShipFormKind};

    const ROLE_ID: &str = "7b1a6c1e-3f52-4b8e-9a3f-2c9d7e41b0a5";

    fn contact(name: &str) -> PersonnelContactForm {
        PersonnelContactForm {
            name: name.into(),
            ..PersonnelContactForm::default()
        }
    }

    fn complete_form(kind: ShipFormKind) -> ShipForm {
        let mut form = ShipForm::new(kind);
        form.add_ship.ship_name = "Atlantic Star".into();
        form.add_ship.ship_imo = "9321483".into();
        form.add_ship.dwt = "45000".into();
        form.add_ship.boarding_port = "Nouakchott".into();
        form.add_ship.ship_status = "Berthed".into();
        form.add_ship.provenance = "Brazil".into();
        form.ship_owner = contact("Owner Ltd");
        form.operation_depart = contact("Ops");
        form.charting_depart = contact("Charter");
        form
    }

    fn file(name: &str, mime: &str, size: usize) -> UploadFile {
        UploadFile {
            name: name.into(),
            mime: mime.into(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn complete_regular_form_is_valid() {
        let form = complete_form(ShipFormKind::Ours);
        assert_eq!(ShipSchema::for_fleet(false).validate(&form), Ok(()));
    }

    #[test]
    fn regular_schema_requires_schedule_fields() {
        let mut form = complete_form(ShipFormKind::Ours);
        form.add_ship.berthing_date = None;
        form.add_ship.ship_status.clear();
        form.add_ship.provenance.clear();

        let errors = ShipSchema::for_fleet(false).validate(&form).unwrap_err();
        assert_eq!(errors.for_path("addShip.berthingDate"), Some(DATE_FORMAT_MESSAGE));
        assert!(errors.for_path("addShip.shipStatus").is_some());
        assert!(errors.for_path("addShip.provenance").is_some());

        assert_eq!(ShipSchema::for_fleet(true).validate(&form), Ok(()));
    }

    #[test]
    fn imo_must_have_exactly_seven_characters() {
        let mut form = complete_form(ShipFormKind::Fleet);
        form.add_ship.ship_imo = "123456".into();
        let errors = ShipSchema::for_fleet(true).validate(&form).unwrap_err();
        assert_eq!(
            errors.for_path("addShip.shipImo"),
            Some("String must contain at least 7 character(s)")
        );

        form.add_ship.ship_imo = "12345678".into();
        let errors = ShipSchema::for_fleet(true).validate(&form).unwrap_err();
        assert_eq!(
            errors.for_path("addShip.shipImo"),
            Some("String must contain at most 7 character(s)")
        );
    }

    #[test]
    fn every_contact_needs_a_name() {
        let mut form = complete_form(ShipFormKind::Ours);
        form.operation_depart = PersonnelContactForm::default();
        let errors = ShipSchema::for_fleet(false).validate(&form).unwrap_err();
        assert_eq!(errors.for_path("operationDepart.name"), Some("Name is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn cargo_rules() {
        let mut cargo = CargaisonForm {
            id: Some("not-a-uuid".into()),
            receiver_email: "nobody".into(),
            ..CargaisonForm::default()
        };
        let errors = validate_cargaison(&cargo);
        assert!(errors.for_path("id").is_some());
        assert!(errors.for_path("type").is_some());
        assert!(errors.for_path("category").is_some());
        assert!(errors.for_path("subCategory").is_some());
        assert_eq!(errors.for_path("receiverEmail"), Some("Invalid email"));
        assert!(errors.for_path("fournisseurEmail").is_none());

        cargo.id = Some(ROLE_ID.into());
        cargo.kind = Some(CargaisonType::Cargaison);
        cargo.category = "Food".into();
        cargo.sub_category = "Tea".into();
        cargo.receiver_email = "ops@sahel.mr".into();
        assert!(validate_cargaison(&cargo).is_empty());
    }

    #[test]
    fn cargo_errors_are_indexed_in_the_ship_form() {
        let mut form = complete_form(ShipFormKind::Ours);
        form.cargoes.push(CargaisonForm::default());
        let errors = ShipSchema::for_fleet(false).validate(&form).unwrap_err();
        assert!(errors.for_path("cargoes.0.category").is_some());
        assert!(errors.has_under("cargoes"));
        assert!(errors.has_under("cargoes.0"));
        assert!(!errors.has_under("addShip"));

        let mut shown = errors.clone();
        shown.push("addShip.shipName", "Required");
        shown.replace_under("cargoes", ValidationErrors::default());
        assert!(!shown.has_under("cargoes"));
        assert_eq!(shown.for_path("addShip.shipName"), Some("Required"));
    }

    #[test]
    fn document_type_size_and_count_limits() {
        let ok = file("bl.pdf", "application/pdf", 1024);
        let wrong_type = file("notes.txt", "text/plain", 10);
        let too_big = file("scan.png", "image/png", (FILE_SIZE_LIMIT_BYTES + 1) as usize);

        let mut form = complete_form(ShipFormKind::Ours);
        form.documents.ship = vec![ok.clone(), wrong_type, too_big];
        form.documents.charter = vec![ok.clone(); MAX_UPLOADED_FILES + 1];

        let errors = ShipSchema::for_fleet(false).validate(&form).unwrap_err();
        assert_eq!(
            errors.for_path("documents.ship.1"),
            Some("Invalid file type. Allowed types: png, jpeg, jpg, svg+xml, pdf")
        );
        assert_eq!(
            errors.for_path("documents.ship.2"),
            Some("File size should not exceed 2MB")
        );
        assert_eq!(
            errors.for_path("documents.charter.$"),
            Some("Array must contain at most 7 element(s)")
        );
        assert!(errors.for_path("documents.ship.0").is_none());
        assert_eq!(document_messages(&errors, DocumentKind::Receiver).len(), 0);
        assert_eq!(document_messages(&errors, DocumentKind::Ship).len(), 2);
    }

    #[test]
    fn email_check() {
        assert!(is_valid_email("agent@navlion.mr"));
        assert!(is_valid_email("first.last@port-authority.co.uk"));
        assert!(!is_valid_email("agent@navlion"));
        assert!(!is_valid_email("agent navlion@x.mr"));
        assert!(!is_valid_email("@navlion.mr"));
        assert!(!is_valid_email("a@@b.mr"));
    }

    #[test]
    fn login_requires_email_and_password() {
        let form = LoginForm {
            email: "agent@navlion.mr".into(),
            password: String::new(),
            remember_me: false,
        };
        let errors = validate_login(&form).unwrap_err();
        assert!(errors.for_path("password").is_some());
        assert!(errors.for_path("email").is_none());
    }

    #[test]
    fn user_update_drops_empty_password() {
        let form = UserForm {
            id: Some("u-1".into()),
            first_name: "Aicha".into(),
            last_name: "Ba".into(),
            email: "aicha@navlion.mr".into(),
            password: String::new(),
            role_id: ROLE_ID.into(),
        };
        let request = validate_user(&form, UserFormMode::Update).unwrap();
        assert_eq!(request.password, None);

        let errors = validate_user(&form, UserFormMode::Create).unwrap_err();
        assert!(errors.for_path("password").is_some());
    }

    #[test]
    fn user_role_must_be_uuid() {
        let form = UserForm {
            first_name: "Aicha".into(),
            last_name: "Ba".into(),
            email: "aicha@navlion.mr".into(),
            password: "secret".into(),
            role_id: "admin".into(),
            ..UserForm::default()
        };
        let errors = validate_user(&form, UserFormMode::Create).unwrap_err();
        assert_eq!(errors.for_path("roleId"), Some("Invalid uuid"));
    }
}
