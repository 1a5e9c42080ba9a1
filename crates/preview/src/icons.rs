//! The icon symbol set bound into every component scope.

/// Icon names in binding order. Each is bound under its own name in the scope.
pub const ICON_NAMES: &[&str] = &[
    "ArrowRight",
    "Facebook",
    "Heart",
    "Instagram",
    "Mail",
    "MapPin",
    "Phone",
    "Search",
    "ShoppingBag",
    "ShoppingCart",
    "Sparkles",
    "Star",
    "Truck",
    "Twitter",
    "User",
    "Youtube",
];

/// A named icon symbol. Scripts pass these to `h.icon(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Icon {
    /// Symbol name, e.g. `Facebook`.
    name: &'static str,
}

impl Icon {
    /// Look up an icon by name.
    pub fn named(name: &str) -> Option<Self> {
        ICON_NAMES
            .iter()
            .find(|n| **n == name)
            .map(|n| Self { name: n })
    }

    /// Symbol name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Every icon in binding order.
pub fn icon_set() -> impl Iterator<Item = Icon> {
    ICON_NAMES.iter().map(|name| Icon { name })
}
