use serde::{Deserialize, Serialize};
use time::Date;

use super::auth::Session;
use super::reports::{format_query_date, DateRange};
use super::ship::{GetFournisseursFilter, GetReceiversFilter, GetShipsFilter};

#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// `None` until the user logs in.
    pub session: Option<Session>,
    /// Username saved by "remember me", used to pre-fill the login form.
    pub remembered_username: Option<String>,
    pub report_filters: ReportFilters,
    pub fournisseur_filters: PartyFilters,
    /// Backend URL chosen in a previous run, if any.
    pub api_base_url: Option<String>,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.as_ref().map(|s| s.access_token.clone())
    }

    /// Stores the session; "remember me" also keeps the username, otherwise it is forgotten.
    pub fn login(&mut self, session: Session, username: &str) {
        self.remembered_username = session.remember.then(|| username.to_string());
        self.session = Some(session);
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.session = persisted.session;
        self.remembered_username = persisted.remembered_username;
        self.api_base_url = persisted.api_base_url;
    }

    /// Only remembered sessions survive a restart.
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            session: self.session.clone().filter(|s| s.remember),
            remembered_username: self.remembered_username.clone(),
            api_base_url: self.api_base_url.clone(),
        }
    }
}

/// Filters of the ships tab, shared with the receivers tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportFilters {
    pub boarding_port: String,
    pub receiver_name: String,
    pub sub_category: String,
    pub category: String,
    pub dwt_from: String,
    pub dwt_to: String,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
}

impl ReportFilters {
    pub fn ships_filter(&self) -> GetShipsFilter {
        GetShipsFilter {
            boarding_port: Some(self.boarding_port.clone()),
            receiver_name: Some(self.receiver_name.clone()),
            sub_category: Some(self.sub_category.clone()),
            category: Some(self.category.clone()),
            date_from: self.date_from.map(format_query_date),
            date_to: self.date_to.map(format_query_date),
            ..GetShipsFilter::default()
        }
    }

    pub fn receivers_filter(&self) -> GetReceiversFilter {
        GetReceiversFilter {
            receiver_name: Some(self.receiver_name.clone()),
            sub_category: Some(self.sub_category.clone()),
        }
    }

    pub fn apply_dates(&mut self, range: Option<DateRange>) {
        self.date_from = range.map(|r| r.from);
        self.date_to = range.map(|r| r.to);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartyFilters {
    pub name: String,
    pub sub_category: String,
}

impl PartyFilters {
    pub fn fournisseurs_filter(&self) -> GetFournisseursFilter {
        GetFournisseursFilter {
            fournisseur_name: Some(self.name.clone()),
            sub_category: Some(self.sub_category.clone()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub remembered_username: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn session(remember: bool) -> Session {
        Session {
            access_token: "token".into(),
            remember,
        }
    }

    #[test]
    fn remembered_login_is_persisted() {
        let mut state = AppState::default();
        state.login(session(true), "agent@navlion.mr");
        let persisted = state.to_persisted();
        assert_eq!(persisted.session, Some(session(true)));
        assert_eq!(persisted.remembered_username.as_deref(), Some("agent@navlion.mr"));

        let mut restored = AppState::default();
        restored.apply_persisted(persisted);
        assert!(restored.is_authenticated());
    }

    #[test]
    fn session_only_login_forgets_username() {
        let mut state = AppState {
            remembered_username: Some("old@navlion.mr".into()),
            ..AppState::default()
        };
        state.login(session(false), "agent@navlion.mr");
        assert!(state.is_authenticated());
        let persisted = state.to_persisted();
        assert_eq!(persisted.session, None);
        assert_eq!(persisted.remembered_username, None);
    }

    #[test]
    fn logout_keeps_remembered_username() {
        let mut state = AppState::default();
        state.login(session(true), "a@b.mr");
        state.logout();
        assert!(!state.is_authenticated());
        assert_eq!(state.remembered_username.as_deref(), Some("a@b.mr"));
        assert_eq!(state.to_persisted().session, None);
    }

    #[test]
    fn report_filters_build_query() {
        let mut filters = ReportFilters {
            boarding_port: "Dakar".into(),
            ..ReportFilters::default()
        };
        filters.apply_dates(DateRange::this_year(date!(2025 - 05 - 01)));
        let pairs = filters.ships_filter().query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("boardingPort", "Dakar".to_string()),
                ("dateFrom", "2025-01-01".to_string()),
                ("dateTo", "2025-12-31".to_string()),
            ]
        );

        filters.apply_dates(None);
        assert_eq!(filters.ships_filter().query_pairs().len(), 1);
        assert!(filters.receivers_filter().query_pairs().is_empty());
    }
}
