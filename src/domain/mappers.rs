//! Conversions between the nested ship form and the flat `ShipDto`.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::warn;

use super::form::{
    CargaisonForm, CargaisonType, DocumentsForm, PartyMode, PersonnelContactForm, ShipDetailsForm, ShipForm,
};
use super::ship::{
    DocumentKind, DocumentUpload, ShipCargoDto, ShipDto, ShipPersonnelContactDto, ShipSubmission,
};

fn format_date(date: Option<OffsetDateTime>) -> Option<String> {
    let date = date?;
    match date.format(&Rfc3339) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!("Could not format date {date:?}: {err}");
            None
        }
    }
}

/// Parses a backend timestamp. Plain `YYYY-MM-DD` dates are read as midnight UTC.
pub fn parse_date(value: &str) -> Option<OffsetDateTime> {
    if let Ok(date) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(date);
    }
    let format = time::macros::format_description!("[year]-[month]-[day]");
    time::Date::parse(value.get(..10)?, &format)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

fn contact_to_dto(contact: &PersonnelContactForm) -> Option<ShipPersonnelContactDto> {
    if contact.is_empty() {
        return None;
    }
    Some(ShipPersonnelContactDto {
        id: None,
        name: contact.name.clone(),
        phone_number: text(&contact.phone_number),
        whats_app_number: text(&contact.whats_app_number),
        we_chat_number: text(&contact.wechat_number),
    })
}

fn contact_from_dto(contact: Option<&ShipPersonnelContactDto>) -> PersonnelContactForm {
    let Some(contact) = contact else {
        return PersonnelContactForm::default();
    };
    PersonnelContactForm {
        name: contact.name.clone(),
        phone_number: contact.phone_number.clone().unwrap_or_default(),
        whats_app_number: contact.whats_app_number.clone().unwrap_or_default(),
        wechat_number: contact.we_chat_number.clone().unwrap_or_default(),
    }
}

fn cargo_to_dto(cargo: &CargaisonForm) -> ShipCargoDto {
    ShipCargoDto {
        id: cargo.id.clone(),
        kind: cargo
            .kind
            .map(|kind| kind.as_str().to_string())
            .unwrap_or_default(),
        category: cargo.category.clone(),
        sub_category: cargo.sub_category.clone(),
        tonnage: cargo.tonnage.clone(),

        receiver_id: cargo.receiver_id.clone(),
        receiver_mic: text(&cargo.receiver_mic),
        receiver_name: cargo.receiver_name.clone(),
        receiver_email: text(&cargo.receiver_email),
        receiver_phone_fixe: text(&cargo.receiver_phone_fixe),
        receiver_phone_mobile: text(&cargo.receiver_phone_mobile),

        fournisseur_id: cargo.fournisseur_id.clone(),
        fournisseur_mic: text(&cargo.fournisseur_mic),
        fournisseur_name: cargo.fournisseur_name.clone(),
        fournisseur_email: text(&cargo.fournisseur_email),
        fournisseur_phone_fixe: text(&cargo.fournisseur_phone_fixe),
        fournisseur_phone_mobile: text(&cargo.fournisseur_phone_mobile),

        phone_number: cargo.phone_number.clone(),
        whats_app_number: cargo.whats_app_number.clone(),
        email: cargo.email.clone(),
    }
}

fn cargo_from_dto(cargo: &ShipCargoDto) -> CargaisonForm {
    CargaisonForm {
        id: cargo.id.clone(),
        kind: Some(CargaisonType::from_wire(&cargo.kind)),
        category: cargo.category.clone(),
        sub_category: cargo.sub_category.clone(),
        tonnage: cargo.tonnage.clone(),

        receiver_mode: PartyMode::for_id(cargo.receiver_id.as_ref()),
        receiver_id: cargo.receiver_id.clone(),
        receiver_mic: cargo.receiver_mic.clone().unwrap_or_default(),
        receiver_name: cargo.receiver_name.clone(),
        receiver_email: cargo.receiver_email.clone().unwrap_or_default(),
        receiver_phone_fixe: cargo.receiver_phone_fixe.clone().unwrap_or_default(),
        receiver_phone_mobile: cargo.receiver_phone_mobile.clone().unwrap_or_default(),

        fournisseur_mode: PartyMode::for_id(cargo.fournisseur_id.as_ref()),
        fournisseur_id: cargo.fournisseur_id.clone(),
        fournisseur_mic: cargo.fournisseur_mic.clone().unwrap_or_default(),
        fournisseur_name: cargo.fournisseur_name.clone(),
        fournisseur_email: cargo.fournisseur_email.clone().unwrap_or_default(),
        fournisseur_phone_fixe: cargo.fournisseur_phone_fixe.clone().unwrap_or_default(),
        fournisseur_phone_mobile: cargo.fournisseur_phone_mobile.clone().unwrap_or_default(),

        phone_number: cargo.phone_number.clone(),
        whats_app_number: cargo.whats_app_number.clone(),
        email: cargo.email.clone(),
    }
}

fn documents_to_uploads(documents: &DocumentsForm) -> Vec<DocumentUpload> {
    documents
        .iter()
        .map(|(kind, files)| DocumentUpload {
            kind,
            files: files.to_vec(),
        })
        .collect()
}

/// Flattens the form into the payload sent to the backend.
pub fn ship_form_to_dto(form: &ShipForm, is_fleet: bool) -> ShipSubmission {
    let details = &form.add_ship;
    let ship = ShipDto {
        id: None,
        name: details.ship_name.clone(),
        imo: details.ship_imo.clone(),
        dwt: details.dwt.clone(),
        ship_type: Some(details.ship_type.clone()),
        boarding_port: details.boarding_port.clone(),
        ship_status: Some(details.ship_status.clone()),
        provenance: Some(details.provenance.clone()),
        agent: Some(details.agent.clone()),
        remarks_and_facts: form.remarks_and_facts.clone(),
        performance_rate: form.performance_rate.clone(),

        berthing_date: format_date(details.berthing_date),
        completion_date: format_date(details.completion_date),

        ship_owner: contact_to_dto(&form.ship_owner),
        operation_depart: contact_to_dto(&form.operation_depart),
        charting_depart: contact_to_dto(&form.charting_depart),

        cargoes: form.cargoes.iter().map(cargo_to_dto).collect(),

        // Server-side ids are never sent back; new files travel as uploads.
        ship_documents: Vec::new(),
        charter_documents: Vec::new(),
        receiver_documents: Vec::new(),

        is_fleet: Some(is_fleet),
    };

    ShipSubmission {
        ship,
        documents: documents_to_uploads(&form.documents),
    }
}

/// Builds the update form from a stored ship.
pub fn ship_dto_to_form(dto: &ShipDto) -> ShipForm {
    let date_or_now = |value: &Option<String>| {
        Some(
            value
                .as_deref()
                .and_then(parse_date)
                .unwrap_or_else(OffsetDateTime::now_utc),
        )
    };

    ShipForm {
        add_ship: ShipDetailsForm {
            ship_name: dto.name.clone(),
            ship_imo: dto.imo.clone(),
            dwt: dto.dwt.clone(),
            ship_type: dto.ship_type.clone().unwrap_or_default(),
            boarding_port: dto.boarding_port.clone(),
            berthing_date: date_or_now(&dto.berthing_date),
            completion_date: date_or_now(&dto.completion_date),
            ship_status: dto.ship_status.clone().unwrap_or_default(),
            provenance: dto.provenance.clone().unwrap_or_default(),
            agent: dto.agent.clone().unwrap_or_default(),
        },
        cargoes: dto.cargoes.iter().map(cargo_from_dto).collect(),
        ship_owner: contact_from_dto(dto.ship_owner.as_ref()),
        operation_depart: contact_from_dto(dto.operation_depart.as_ref()),
        charting_depart: contact_from_dto(dto.charting_depart.as_ref()),
        documents: DocumentsForm::default(),
        ship_documents: dto.documents_of(DocumentKind::Ship).to_vec(),
        charter_documents: dto.documents_of(DocumentKind::Charter).to_vec(),
        receiver_documents: dto.documents_of(DocumentKind::Receiver).to_vec(),
        remarks_and_facts: dto.remarks_and_facts.clone(),
        performance_rate: dto.performance_rate.clone(),
    }
}

/// Payload that turns a fleet ship into a regular one.
pub fn fleet_to_ship(dto: &ShipDto) -> ShipDto {
    ShipDto {
        is_fleet: Some(false),
        ..dto.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::form::ShipFormKind;
    use crate::domain::ship::{empty_strings_to_null, UploadFile};
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn filled_form() -> ShipForm {
        let mut form = ShipForm::new(ShipFormKind::Ours);
        form.add_ship.ship_name = "Atlantic Star".into();
        form.add_ship.ship_imo = "9321483".into();
        form.add_ship.dwt = "45000".into();
        form.add_ship.boarding_port = "Nouakchott".into();
        form.add_ship.berthing_date = Some(datetime!(2025-03-04 08:30 UTC));
        form.add_ship.completion_date = None;
        form.ship_owner = PersonnelContactForm {
            name: "Owner Ltd".into(),
            wechat_number: "wx-77".into(),
            ..PersonnelContactForm::default()
        };
        form.cargoes.push(CargaisonForm {
            kind: Some(CargaisonType::Container),
            category: "Food".into(),
            sub_category: "Rice".into(),
            tonnage: "1200".into(),
            receiver_name: "Sahel Import".into(),
            ..CargaisonForm::default()
        });
        form.documents.charter = vec![UploadFile {
            name: "cp.pdf".into(),
            mime: "application/pdf".into(),
            bytes: vec![1, 2, 3],
        }];
        form.ship_documents = vec!["doc-1".into()];
        form
    }

    #[test]
    fn form_flattens_into_dto() {
        let submission = ship_form_to_dto(&filled_form(), false);
        let ship = &submission.ship;

        assert_eq!(ship.name, "Atlantic Star");
        assert_eq!(ship.imo, "9321483");
        assert_eq!(ship.agent.as_deref(), Some("NAVLION"));
        assert_eq!(ship.berthing_date.as_deref(), Some("2025-03-04T08:30:00Z"));
        assert_eq!(ship.completion_date, None);
        assert_eq!(ship.is_fleet, Some(false));

        let owner = ship.ship_owner.as_ref().unwrap();
        assert_eq!(owner.name, "Owner Ltd");
        assert_eq!(owner.we_chat_number.as_deref(), Some("wx-77"));
        assert!(ship.operation_depart.is_none());
        assert!(ship.charting_depart.is_none());

        assert_eq!(ship.cargoes[0].kind, "container");
        assert!(ship.ship_documents.is_empty());

        assert_eq!(submission.documents.len(), 3);
        let pending: Vec<_> = submission.pending_uploads().collect();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].kind, DocumentKind::Charter);
        assert_eq!(pending[0].files[0].name, "cp.pdf");
    }

    #[test]
    fn documents_never_reach_the_json_body() {
        let submission = ship_form_to_dto(&filled_form(), true);
        let body = serde_json::to_value(&submission.ship).unwrap();
        assert!(body.get("documents").is_none());
        assert_eq!(body["isFleet"], true);
        assert_eq!(body["shipDocuments"], serde_json::json!([]));
    }

    #[test]
    fn dto_prefills_update_form() {
        let dto: ShipDto = serde_json::from_value(serde_json::json!({
            "id": "s-1",
            "name": "Atlantic Star",
            "imo": "9321483",
            "dwt": "45000",
            "boardingPort": "Nouakchott",
            "berthingDate": "2025-03-04T08:30:00Z",
            "chartingDepart": { "name": "Charter", "weChatNumber": "wx-1" },
            "cargoes": [
                { "id": "c-1", "type": "container", "category": "Food", "subCategory": "Rice" },
                { "type": "bulk", "category": "Cereals", "subCategory": "Wheat" }
            ],
            "shipDocuments": ["d-1"],
            "receiverDocuments": ["d-2", "d-3"]
        }))
        .unwrap();

        let form = ship_dto_to_form(&dto);
        assert_eq!(form.add_ship.ship_name, "Atlantic Star");
        assert_eq!(form.add_ship.ship_status, "");
        assert_eq!(form.add_ship.agent, "");
        assert_eq!(form.add_ship.berthing_date, Some(datetime!(2025-03-04 08:30 UTC)));
        assert!(form.add_ship.completion_date.is_some());
        assert_eq!(form.cargoes[0].id.as_deref(), Some("c-1"));
        assert_eq!(form.cargoes[0].kind, Some(CargaisonType::Container));
        assert_eq!(form.cargoes[1].kind, Some(CargaisonType::Cargaison));
        assert_eq!(form.charting_depart.wechat_number, "wx-1");
        assert_eq!(form.ship_owner, PersonnelContactForm::default());
        assert_eq!(form.documents, DocumentsForm::default());
        assert_eq!(form.ship_documents, vec!["d-1".to_string()]);
        assert_eq!(form.receiver_documents.len(), 2);
    }

    #[test]
    fn stored_ship_reopens_as_the_submitted_form() {
        let mut form = filled_form();
        form.remarks_and_facts = "Draft limited to 9m".into();
        form.cargoes[0].id = Some("c-1".into());
        form.cargoes[0].receiver_mode = PartyMode::Existing;
        form.cargoes[0].receiver_id = Some("r-1".into());
        form.cargoes[0].fournisseur_name = "Dakar Mills".into();
        form.cargoes[0].fournisseur_email = "sales@dakar.test".into();

        let submission = ship_form_to_dto(&form, false);
        let mut body = serde_json::to_value(&submission.ship).unwrap();
        empty_strings_to_null(&mut body);
        let mut stored: ShipDto = serde_json::from_value(body).unwrap();
        stored.id = Some("s-1".into());
        stored.ship_documents = vec!["doc-1".into()];
        stored.charter_documents = vec!["doc-2".into()];

        let reopened = ship_dto_to_form(&stored);
        assert_eq!(reopened.add_ship.ship_imo, "9321483");
        assert_eq!(reopened.add_ship.berthing_date, form.add_ship.berthing_date);
        assert_eq!(reopened.remarks_and_facts, "Draft limited to 9m");
        assert_eq!(reopened.performance_rate, "");
        assert_eq!(reopened.ship_owner, form.ship_owner);
        assert_eq!(reopened.cargoes, form.cargoes);
        assert_eq!(reopened.cargoes[0].receiver_mode, PartyMode::Existing);
        assert_eq!(reopened.cargoes[0].fournisseur_mode, PartyMode::New);
        assert_eq!(reopened.ship_documents, vec!["doc-1".to_string()]);
        assert_eq!(reopened.charter_documents, vec!["doc-2".to_string()]);
        assert!(reopened.receiver_documents.is_empty());

        // A missing completion date comes back as "now" and blank contacts as defaults.
        assert!(reopened.add_ship.completion_date.is_some());
        assert_eq!(reopened.operation_depart, PersonnelContactForm::default());
        assert_eq!(reopened.documents, DocumentsForm::default());
    }

    #[test]
    fn plain_dates_parse_as_midnight() {
        assert_eq!(parse_date("2024-12-31"), Some(datetime!(2024-12-31 0:00 UTC)));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn fleet_conversion_only_flips_the_flag() {
        let dto = ShipDto {
            id: Some("s-9".into()),
            name: "Harbour Queen".into(),
            is_fleet: Some(true),
            ..ShipDto::default()
        };
        let converted = fleet_to_ship(&dto);
        assert_eq!(converted.is_fleet, Some(false));
        assert_eq!(converted.name, dto.name);
        assert_eq!(converted.id, dto.id);
    }
}
