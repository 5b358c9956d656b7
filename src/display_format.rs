use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Copy, Clone)]
pub struct DisplayFormat {
    pub hanja: bool,
    pub color: bool,
    pub concise: bool,
}

static DEFAULT_HANJA: AtomicBool = AtomicBool::new(true);
static DEFAULT_COLOR: AtomicBool = AtomicBool::new(true);

impl DisplayFormat {
    pub fn default(concise: bool) -> Self {
        Self {
            hanja: DEFAULT_HANJA.load(Ordering::Relaxed),
            color: DEFAULT_COLOR.load(Ordering::Relaxed),
            concise,
        }
    }

    pub fn pretty() -> Self {
        Self::default(false)
    }

    pub fn string() -> Self {
        Self {
            color: false,
            ..Self::default(true)
        }
    }

    pub fn with_concise(&self, concise: bool) -> Self {
        Self { concise, ..*self }
    }

    pub fn set_default_hanja(hanja: bool) {
        DEFAULT_HANJA.store(hanja, Ordering::Relaxed);
    }

    pub fn set_default_color(color: bool) {
        DEFAULT_COLOR.store(color, Ordering::Relaxed);
    }
}
