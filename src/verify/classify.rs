use crate::report::report_model::ClickStatus;

/// Signals gathered around one click attempt.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    pub url_before: String,
    pub url_after: String,
    pub title_before: String,
    pub title_after: String,
    pub dom_changed: bool,
    pub modal_present: bool,
    pub dropdown_present: bool,
    /// href/onclick matched a known inert pattern
    pub suspicious_pattern: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: ClickStatus,
    pub error_message: Option<String>,
    pub page_changed: bool,
    pub new_elements_appeared: bool,
}

/// Map observed signals to a final status.
///
/// Checked in strength order: navigation beats a title change beats a DOM
/// mutation beats a modal/dropdown. Only when nothing at all happened does
/// the inert-markup pattern get consulted, so suspicious markup backed by a
/// real script-driven effect still classifies as active.
/// `new_elements_appeared` is set only on the UI-change outcome itself; a
/// click that navigated and also left a modal behind reports the
/// navigation alone.
pub fn classify(obs: &Observation) -> Classification {
    if obs.url_after != obs.url_before {
        return active(ClickStatus::ActiveNavigation, false);
    }
    if obs.title_after != obs.title_before {
        return active(ClickStatus::ActiveTitleChange, false);
    }
    if obs.dom_changed {
        return active(ClickStatus::ActiveDomChange, false);
    }
    if obs.modal_present || obs.dropdown_present {
        return active(ClickStatus::ActiveUiChange, true);
    }

    let error_message = if obs.suspicious_pattern {
        "href/onclick matches a known dead pattern"
    } else {
        "click produced no visible effect"
    };
    Classification {
        status: ClickStatus::DeadClick,
        error_message: Some(error_message.to_string()),
        page_changed: false,
        new_elements_appeared: false,
    }
}

fn active(status: ClickStatus, new_elements_appeared: bool) -> Classification {
    Classification {
        status,
        error_message: None,
        page_changed: true,
        new_elements_appeared,
    }
}
