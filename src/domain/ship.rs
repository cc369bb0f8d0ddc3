//! Transport shapes exchanged with the back-office REST API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Identifier for ships, cargoes and documents returned by the API.
pub type EntityId = String;

/// Reads an explicit `null` as the type's default. Blank fields are sent as
/// `null`, so the backend echoes them back that way.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub imo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dwt: String,
    pub ship_type: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub boarding_port: String,
    pub ship_status: Option<String>,
    pub provenance: Option<String>,
    pub agent: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub remarks_and_facts: String,
    #[serde(deserialize_with = "null_as_default")]
    pub performance_rate: String,

    pub berthing_date: Option<String>,
    pub completion_date: Option<String>,

    pub ship_owner: Option<ShipPersonnelContactDto>,
    pub operation_depart: Option<ShipPersonnelContactDto>,
    pub charting_depart: Option<ShipPersonnelContactDto>,

    #[serde(deserialize_with = "null_as_default")]
    pub cargoes: Vec<ShipCargoDto>,

    /// Document ids already stored by the backend.
    #[serde(deserialize_with = "null_as_default")]
    pub ship_documents: Vec<EntityId>,
    #[serde(deserialize_with = "null_as_default")]
    pub charter_documents: Vec<EntityId>,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_documents: Vec<EntityId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fleet: Option<bool>,
}

impl ShipDto {
    pub fn is_fleet(&self) -> bool {
        self.is_fleet.unwrap_or(false)
    }

    pub fn has_documents(&self) -> bool {
        !(self.ship_documents.is_empty()
            && self.charter_documents.is_empty()
            && self.receiver_documents.is_empty())
    }

    pub fn documents_of(&self, kind: DocumentKind) -> &[EntityId] {
        match kind {
            DocumentKind::Ship => &self.ship_documents,
            DocumentKind::Charter => &self.charter_documents,
            DocumentKind::Receiver => &self.receiver_documents,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipPersonnelContactDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub phone_number: Option<String>,
    pub whats_app_number: Option<String>,
    pub we_chat_number: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShipCargoDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tonnage: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<EntityId>,
    #[serde(rename = "receiverMIC", skip_serializing_if = "Option::is_none")]
    pub receiver_mic: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_name: String,
    pub receiver_email: Option<String>,
    pub receiver_phone_fixe: Option<String>,
    pub receiver_phone_mobile: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fournisseur_id: Option<EntityId>,
    #[serde(rename = "fournisseurMIC", skip_serializing_if = "Option::is_none")]
    pub fournisseur_mic: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub fournisseur_name: String,
    pub fournisseur_email: Option<String>,
    pub fournisseur_phone_fixe: Option<String>,
    pub fournisseur_phone_mobile: Option<String>,

    // Legacy contact fields still read by older reports.
    #[serde(deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub whats_app_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

/// Category of an uploaded ship document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    Ship,
    Charter,
    Receiver,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Ship,
        DocumentKind::Charter,
        DocumentKind::Receiver,
    ];

    /// Maps the form section key to a document kind. Unknown keys fall back to `Ship`.
    pub fn from_form_key(key: &str) -> Self {
        match key {
            "charter" => DocumentKind::Charter,
            "receiver" => DocumentKind::Receiver,
            "ship" => DocumentKind::Ship,
            other => {
                warn!("Uploaded document type {other:?} is not supported, defaulting to SHIP");
                DocumentKind::Ship
            }
        }
    }

    pub fn form_key(&self) -> &'static str {
        match self {
            DocumentKind::Ship => "ship",
            DocumentKind::Charter => "charter",
            DocumentKind::Receiver => "receiver",
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            DocumentKind::Ship => "SHIP",
            DocumentKind::Charter => "CHARTER",
            DocumentKind::Receiver => "RECEIVER",
        }
    }
}

/// A file picked by the user and not yet uploaded.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub files: Vec<UploadFile>,
}

/// A ship payload plus the files to upload once the ship exists.
#[derive(Clone, Debug, PartialEq)]
pub struct ShipSubmission {
    pub ship: ShipDto,
    pub documents: Vec<DocumentUpload>,
}

impl ShipSubmission {
    pub fn pending_uploads(&self) -> impl Iterator<Item = &DocumentUpload> {
        self.documents.iter().filter(|doc| !doc.files.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetShipsFilter {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub boarding_port: Option<String>,
    pub receiver_name: Option<String>,
    pub sub_category: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl GetShipsFilter {
    /// Query parameters with absent and empty values removed.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let numbers = [("page", self.page), ("size", self.size)]
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v.to_string())));
        let strings = [
            ("boardingPort", &self.boarding_port),
            ("receiverName", &self.receiver_name),
            ("subCategory", &self.sub_category),
            ("category", &self.category),
            ("dateFrom", &self.date_from),
            ("dateTo", &self.date_to),
        ];
        numbers
            .chain(non_empty_pairs(&strings))
            .collect()
    }
}

/// Filters accepted by the ships PDF export. `is_fleet` is sent whenever it is set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShipsExportFilter {
    pub boarding_port: Option<String>,
    pub receiver_name: Option<String>,
    pub sub_category: Option<String>,
    pub is_fleet: Option<bool>,
}

impl ShipsExportFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let strings = [
            ("boardingPort", &self.boarding_port),
            ("receiverName", &self.receiver_name),
            ("subCategory", &self.sub_category),
        ];
        non_empty_pairs(&strings)
            .chain(self.is_fleet.map(|flag| ("isFleet", flag.to_string())))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CargoDetailsDto {
    #[serde(deserialize_with = "null_as_default")]
    pub ship_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ship_imo: String,
    #[serde(deserialize_with = "null_as_default")]
    pub boarding_port: String,
    pub completion_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tonnage: String,
    pub provenance: Option<String>,
    pub receiver_name: Option<String>,
    pub fournisseur_name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_documents: Vec<EntityId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceiverSummaryDto {
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_id: EntityId,
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_name: String,
    pub receiver_email: Option<String>,
    pub receiver_phone_fixe: Option<String>,
    pub receiver_phone_mobile: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_cargoes: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total_tonnage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cargoes: Vec<CargoDetailsDto>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetReceiversFilter {
    pub receiver_name: Option<String>,
    pub sub_category: Option<String>,
}

impl GetReceiversFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        non_empty_pairs(&[
            ("receiverName", &self.receiver_name),
            ("subCategory", &self.sub_category),
        ])
        .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FournisseurSummaryDto {
    #[serde(deserialize_with = "null_as_default")]
    pub fournisseur_id: EntityId,
    #[serde(deserialize_with = "null_as_default")]
    pub fournisseur_name: String,
    pub fournisseur_email: Option<String>,
    pub fournisseur_phone_fixe: Option<String>,
    pub fournisseur_phone_mobile: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub total_tonnage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub cargoes: Vec<CargoDetailsDto>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetFournisseursFilter {
    pub fournisseur_name: Option<String>,
    pub sub_category: Option<String>,
}

impl GetFournisseursFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        non_empty_pairs(&[
            ("fournisseurName", &self.fournisseur_name),
            ("subCategory", &self.sub_category),
        ])
        .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceiverTonnageDto {
    #[serde(deserialize_with = "null_as_default")]
    pub receiver_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tonnage: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubCategorySummaryDto {
    #[serde(deserialize_with = "null_as_default")]
    pub sub_category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_tonnage: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub receivers: Vec<ReceiverTonnageDto>,
}

fn non_empty_pairs<'a>(
    pairs: &'a [(&'static str, &'a Option<String>)],
) -> impl Iterator<Item = (&'static str, String)> + 'a {
    pairs.iter().filter_map(|(key, value)| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| (*key, v.to_string()))
    })
}

/// Replaces every empty string in `value` with `null`, recursing into objects and arrays.
pub fn empty_strings_to_null(value: &mut Value) {
    match value {
        Value::String(text) if text.is_empty() => *value = Value::Null,
        Value::Object(map) => map.values_mut().for_each(empty_strings_to_null),
        Value::Array(items) => items.iter_mut().for_each(empty_strings_to_null),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_strings_become_null_at_every_depth() {
        let mut value = json!({
            "name": "",
            "imo": "1234567",
            "shipOwner": { "name": "", "phoneNumber": "555" },
            "cargoes": [{ "category": "", "tonnage": "10" }],
            "isFleet": false
        });
        empty_strings_to_null(&mut value);
        assert_eq!(
            value,
            json!({
                "name": null,
                "imo": "1234567",
                "shipOwner": { "name": null, "phoneNumber": "555" },
                "cargoes": [{ "category": null, "tonnage": "10" }],
                "isFleet": false
            })
        );
    }

    #[test]
    fn ship_dto_reads_sparse_backend_payloads() {
        let dto: ShipDto = serde_json::from_value(json!({
            "id": "a1",
            "name": "Atlantic Star",
            "imo": "9321483",
            "dwt": "45000",
            "boardingPort": "Nouakchott",
            "shipOwner": null,
            "cargoes": [{
                "type": "container",
                "category": "Food",
                "subCategory": "Rice",
                "tonnage": "1200",
                "receiverName": "Sahel Import",
                "receiverMIC": "MIC-9"
            }],
            "isFleet": true
        }))
        .unwrap();

        assert_eq!(dto.name, "Atlantic Star");
        assert!(dto.ship_owner.is_none());
        assert!(dto.is_fleet());
        assert!(dto.ship_documents.is_empty());
        assert_eq!(dto.cargoes[0].kind, "container");
        assert_eq!(dto.cargoes[0].receiver_mic.as_deref(), Some("MIC-9"));
        assert_eq!(dto.cargoes[0].fournisseur_name, "");
    }

    #[test]
    fn ship_dto_reads_null_text_fields_as_empty() {
        let dto: ShipDto = serde_json::from_value(json!({
            "id": "b2",
            "name": "Sahara Dawn",
            "imo": "9100200",
            "dwt": null,
            "boardingPort": "Nouakchott",
            "remarksAndFacts": null,
            "performanceRate": null,
            "shipOwner": { "name": null, "phoneNumber": "555" },
            "cargoes": [{
                "type": "cargaison",
                "category": "Food",
                "subCategory": null,
                "tonnage": "800",
                "receiverName": "Sahel Import",
                "fournisseurName": null,
                "phoneNumber": null,
                "whatsAppNumber": null,
                "email": null
            }],
            "shipDocuments": null,
            "isFleet": false
        }))
        .unwrap();

        assert_eq!(dto.remarks_and_facts, "");
        assert_eq!(dto.performance_rate, "");
        assert_eq!(dto.dwt, "");
        assert!(dto.ship_documents.is_empty());
        assert_eq!(dto.ship_owner.as_ref().map(|c| c.name.as_str()), Some(""));
        let cargo = &dto.cargoes[0];
        assert_eq!(cargo.sub_category, "");
        assert_eq!(cargo.fournisseur_name, "");
        assert_eq!(cargo.phone_number, "");
        assert_eq!(cargo.email, "");

        let details: CargoDetailsDto = serde_json::from_value(json!({
            "shipName": null,
            "tonnage": "12",
            "receiverDocuments": null
        }))
        .unwrap();
        assert_eq!(details.ship_name, "");
        assert!(details.receiver_documents.is_empty());
    }

    #[test]
    fn cargo_serializes_with_backend_field_names() {
        let cargo = ShipCargoDto {
            kind: "cargaison".into(),
            receiver_mic: Some("R-1".into()),
            ..ShipCargoDto::default()
        };
        let value = serde_json::to_value(&cargo).unwrap();
        assert_eq!(value["type"], "cargaison");
        assert_eq!(value["receiverMIC"], "R-1");
        assert!(value.get("id").is_none());
        assert!(value.get("fournisseurMIC").is_none());
        assert_eq!(value["whatsAppNumber"], "");
    }

    #[test]
    fn document_kind_maps_form_keys() {
        assert_eq!(DocumentKind::from_form_key("charter"), DocumentKind::Charter);
        assert_eq!(DocumentKind::from_form_key("receiver"), DocumentKind::Receiver);
        assert_eq!(DocumentKind::from_form_key("ship"), DocumentKind::Ship);
        assert_eq!(DocumentKind::from_form_key("invoice"), DocumentKind::Ship);
        assert_eq!(
            serde_json::to_value(DocumentKind::Charter).unwrap(),
            json!("CHARTER")
        );
    }

    #[test]
    fn export_filter_always_sends_fleet_flag_when_set() {
        let filter = ShipsExportFilter {
            sub_category: Some("Rice".into()),
            is_fleet: Some(false),
            ..ShipsExportFilter::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("subCategory", "Rice".to_string()),
                ("isFleet", "false".to_string()),
            ]
        );
        assert!(ShipsExportFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn ship_filter_drops_blank_values() {
        let filter = GetShipsFilter {
            boarding_port: Some("Nouadhibou".into()),
            receiver_name: Some(String::new()),
            date_from: Some("2025-01-01".into()),
            size: Some(50),
            ..GetShipsFilter::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("size", "50".to_string()),
                ("boardingPort", "Nouadhibou".to_string()),
                ("dateFrom", "2025-01-01".to_string()),
            ]
        );
    }
}
