//! Color-theme preference, persisted through presentation-supplied storage.

use mockall::automock;

const PALETTE_STORAGE_KEY: &str = "taskflow-color-palette";

/// The selectable color palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPalette {
    #[default]
    TealIndigo,
    BluePurple,
    GreenOrange,
}

impl ColorPalette {
    pub const ALL: [ColorPalette; 3] = [
        ColorPalette::TealIndigo,
        ColorPalette::BluePurple,
        ColorPalette::GreenOrange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorPalette::TealIndigo => "teal-indigo",
            ColorPalette::BluePurple => "blue-purple",
            ColorPalette::GreenOrange => "green-orange",
        }
    }

    /// Parses a stored value, falling back to the default palette on anything
    /// unknown.
    pub fn parse(value: &str) -> Self {
        match value {
            "blue-purple" => ColorPalette::BluePurple,
            "green-orange" => ColorPalette::GreenOrange,
            _ => ColorPalette::default(),
        }
    }
}

/// Key-value storage supplied by the presentation layer (browser local
/// storage, a settings file, an in-memory map in tests).
#[automock]
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// The persisted palette selection.
pub struct PaletteSelection<P> {
    store: P,
    current: ColorPalette,
}

impl<P: PreferenceStore> PaletteSelection<P> {
    /// Loads the stored selection, defaulting when nothing (or something
    /// unknown) is stored.
    pub fn load(store: P) -> Self {
        let current = store
            .get(PALETTE_STORAGE_KEY)
            .map(|value| ColorPalette::parse(&value))
            .unwrap_or_default();
        Self { store, current }
    }

    pub fn current(&self) -> ColorPalette {
        self.current
    }

    /// Changes the selection and persists it immediately.
    pub fn set(&mut self, palette: ColorPalette) {
        self.store.set(PALETTE_STORAGE_KEY, palette.as_str());
        self.current = palette;
    }
}

/// Deterministic category-to-palette-slot mapping for cosmetic coloring.
/// Any stable mapping would do; this sums the character codes.
pub fn category_palette_index(category: &str, palette_len: usize) -> usize {
    if palette_len == 0 {
        return 0;
    }
    let sum: usize = category.chars().map(|c| c as usize).sum();
    sum % palette_len
}
