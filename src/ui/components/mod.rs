pub mod cache_note;
pub mod cargo_section;
pub mod contact_card;
pub mod data_table;
pub mod documents;
pub mod fields;
pub mod kpi_card;
pub mod modal;
pub mod ship_dialogs;
pub mod toast;
