/// Imperative side of the external gesture recognizer.
pub trait Recognizer {
    fn enable(&mut self);
    fn disable(&mut self);
}

/// Reasons the recognizer must stay off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hold {
    Drag,
    Catalog,
}

/// Tracks which holds are active and talks to the recognizer only on the
/// edges: `disable()` when the first hold is taken, `enable()` when the last
/// one is released. Repeated acquire/release of the same hold is a no-op.
#[derive(Debug, Default)]
pub struct RecognizerHolds {
    drag: bool,
    catalog: bool,
}

impl RecognizerHolds {
    pub fn is_held(&self, hold: Hold) -> bool {
        match hold {
            Hold::Drag => self.drag,
            Hold::Catalog => self.catalog,
        }
    }

    pub fn any(&self) -> bool {
        self.drag || self.catalog
    }

    fn slot(&mut self, hold: Hold) -> &mut bool {
        match hold {
            Hold::Drag => &mut self.drag,
            Hold::Catalog => &mut self.catalog,
        }
    }

    pub fn acquire(&mut self, hold: Hold, recognizer: &mut dyn Recognizer) -> bool {
        let was_held = self.any();
        let slot = self.slot(hold);
        if *slot {
            return false;
        }
        *slot = true;
        if !was_held {
            log::debug!("recognizer disabled by {hold:?}");
            recognizer.disable();
        }
        true
    }

    pub fn release(&mut self, hold: Hold, recognizer: &mut dyn Recognizer) -> bool {
        let slot = self.slot(hold);
        if !*slot {
            return false;
        }
        *slot = false;
        if !self.any() {
            log::debug!("recognizer enabled after {hold:?}");
            recognizer.enable();
        }
        true
    }
}
