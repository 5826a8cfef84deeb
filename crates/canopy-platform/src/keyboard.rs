use serde::{Deserialize, Serialize};

/// Primary language identifier of a keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageId(pub u16);

impl LanguageId {
    pub const ENGLISH: LanguageId = LanguageId(0x09);
    pub const ARABIC: LanguageId = LanguageId(0x01);
    pub const HEBREW: LanguageId = LanguageId(0x0d);
    pub const PERSIAN: LanguageId = LanguageId(0x29);

    pub fn is_rtl(self) -> bool {
        matches!(self, Self::ARABIC | Self::HEBREW | Self::PERSIAN)
    }
}

pub trait KeyboardLayouts {
    /// Languages of the installed layouts, or `None` if the list could not
    /// be read.
    fn installed_layouts(&self) -> Option<Vec<LanguageId>>;
}
