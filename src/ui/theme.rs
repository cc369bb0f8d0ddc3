//! Class helpers so pages share one look; the rules live in `assets/main.css`.

pub fn btn() -> &'static str {
    "btn"
}

pub fn btn_primary() -> &'static str {
    "btn btn-primary"
}

pub fn btn_danger() -> &'static str {
    "btn btn-danger"
}

pub fn btn_small() -> &'static str {
    "btn btn-small"
}

pub fn btn_small_danger() -> &'static str {
    "btn btn-small btn-danger"
}

pub fn nav_link(active: bool) -> &'static str {
    if active {
        "nav-link active"
    } else {
        "nav-link"
    }
}

pub fn tab(active: bool) -> &'static str {
    if active {
        "tab active"
    } else {
        "tab"
    }
}

pub fn input(invalid: bool) -> &'static str {
    if invalid {
        "input invalid"
    } else {
        "input"
    }
}

pub fn panel() -> &'static str {
    "panel"
}

pub fn table() -> &'static str {
    "data"
}
