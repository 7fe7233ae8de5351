//! Ready-made models for the metadata section of a save.
//!
//! These cover the `meta` document shipped alongside the main gamestate;
//! they double as a worked example of [`save_model!`](crate::save_model)
//! declarations.

use crate::types::SaveDate;

crate::save_model! {
    /// Top-level metadata: game version, save name, and the player
    /// empire's presentation fields.
    pub struct Meta {
        scalar("version") version: String,
        scalar("version_control_revision") version_control_revision: i32,
        scalar("name") name: String,
        scalar("date") date: Option<SaveDate>,
        array("required_dlcs") required_dlcs: Vec<String>,
        scalar("ironman") ironman: bool,
        scalar("player_portrait") player_portrait: String,
        object("flag") flag: Option<MetaFlag>,
        scalar("meta_fleets") meta_fleets: i32,
        scalar("meta_planets") meta_planets: i32,
    }
}

crate::save_model! {
    /// The player empire's flag: layered graphics plus a palette.
    pub struct MetaFlag {
        object("icon") icon: Option<MetaIcon>,
        object("background") background: Option<MetaBackground>,
        array("colors") colors: Vec<String>,
    }
}

crate::save_model! {
    pub struct MetaIcon {
        scalar("category") category: String,
        scalar("file") file: String,
    }
}

crate::save_model! {
    pub struct MetaBackground {
        scalar("category") category: String,
        scalar("file") file: String,
    }
}

crate::save_model! {
    /// One entry of the `player` list: which country a player controls.
    pub struct Player {
        scalar("name") name: String,
        scalar("country") country: i32,
    }
}

crate::save_model! {
    pub struct IronmanManager {
        scalar("checksum") checksum: String,
        scalar("date") date: Option<SaveDate>,
    }
}
