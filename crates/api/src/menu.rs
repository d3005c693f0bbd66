//! The registrable admin-shell menu entry for surveys.
//!
//! The host admin shell asks for this descriptor and shows the entry only
//! when the caller manages submissions for at least one survey page.

use serde::Serialize;

/// Position of the surveys entry in the host admin menu.
pub const SURVEYS_MENU_ORDER: u32 = 300;

/// A menu entry descriptor consumable by the host admin shell.
#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub name: &'static str,
    pub label: &'static str,
    pub url: &'static str,
    pub order: u32,
    /// Whether the entry should be visible to the requesting user.
    pub shown: bool,
}

/// Build the surveys menu entry.
pub fn surveys_menu_item(shown: bool) -> MenuItem {
    MenuItem {
        name: "surveys",
        label: "Surveys",
        url: "/api/v1/surveys",
        order: SURVEYS_MENU_ORDER,
        shown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_item_shape() {
        let item = surveys_menu_item(true);
        assert_eq!(item.name, "surveys");
        assert_eq!(item.order, 300);
        assert!(item.shown);

        let json = serde_json::to_value(surveys_menu_item(false)).unwrap();
        assert_eq!(json["shown"], false);
        assert_eq!(json["label"], "Surveys");
    }
}
