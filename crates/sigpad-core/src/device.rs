//! Host capability probe and the listener plan derived from it.
//!
//! The host is probed once, at construction. The resulting [`DeviceClass`]
//! picks one of two fixed listener sets; the choice never changes later.

/// Snapshot of what the host environment reports.
///
/// Built by the host bridge (from `window`) or by hand in tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HostEnvironment {
    /// `window.devicePixelRatio`, if the host reports one.
    pub device_pixel_ratio: Option<f64>,
    /// Whether the host exposes a touch-start handler slot.
    pub has_touch_start: bool,
    /// Legacy `window.orientation` value, if any.
    pub orientation: Option<f64>,
}

impl HostEnvironment {
    /// A plain desktop host at the given pixel ratio.
    pub fn desktop(device_pixel_ratio: f64) -> Self {
        Self {
            device_pixel_ratio: Some(device_pixel_ratio),
            ..Default::default()
        }
    }

    /// A touch host at the given pixel ratio.
    pub fn touch(device_pixel_ratio: f64) -> Self {
        Self {
            device_pixel_ratio: Some(device_pixel_ratio),
            has_touch_start: true,
            orientation: None,
        }
    }

    /// Scale factor for the backing buffer; `1` when the host reports none.
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.unwrap_or(1.0)
    }

    /// Classify the device. An orientation of `0` (portrait) does not count
    /// on its own; only a truthy orientation does.
    pub fn device_class(&self) -> DeviceClass {
        let oriented = self.orientation.is_some_and(crate::model::is_truthy);
        if self.has_touch_start || oriented {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn is_mobile(self) -> bool {
        matches!(self, DeviceClass::Mobile)
    }

    /// The listeners the host must install for this device class.
    pub fn listeners(self) -> &'static [Listener] {
        match self {
            DeviceClass::Mobile => MOBILE_LISTENERS,
            DeviceClass::Desktop => DESKTOP_LISTENERS,
        }
    }
}

// ─── Listener plan ───────────────────────────────────────────────────────

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTarget {
    /// The drawing surface itself.
    Surface,
    /// The whole document: pointer released anywhere.
    Document,
}

/// Which pad handler a DOM event feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// One DOM listener the host bridge installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub target: ListenTarget,
    /// DOM event name, e.g. `"mousedown"`.
    pub event: &'static str,
    pub action: PadAction,
}

const MOBILE_LISTENERS: &[Listener] = &[
    Listener {
        target: ListenTarget::Surface,
        event: "touchstart",
        action: PadAction::Down,
    },
    Listener {
        target: ListenTarget::Surface,
        event: "touchmove",
        action: PadAction::Move,
    },
    Listener {
        target: ListenTarget::Surface,
        event: "touchcancel",
        action: PadAction::Cancel,
    },
];

const DESKTOP_LISTENERS: &[Listener] = &[
    Listener {
        target: ListenTarget::Surface,
        event: "mousedown",
        action: PadAction::Down,
    },
    Listener {
        target: ListenTarget::Surface,
        event: "mousemove",
        action: PadAction::Move,
    },
    Listener {
        target: ListenTarget::Document,
        event: "mouseup",
        action: PadAction::Up,
    },
];
