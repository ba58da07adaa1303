//! Screen registry
//!
//! Each screen is a declarative descriptor: title and body translation keys,
//! the profile fields interpolated into the body, and its button rows. Adding
//! a screen means adding an entry to [`SCREENS`].

pub const HOME: &str = "home";
pub const MENU: &str = "menu";
pub const HELP: &str = "help";
pub const BANK: &str = "bank";
pub const MY_LONGS: &str = "my_longs";
pub const MY_STATS: &str = "my_stats";
pub const PLANS: &str = "plans";
pub const SETTINGS: &str = "settings";

/// Dynamic value interpolated into a screen body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserId,
    Language,
    Currency,
    Plan,
    /// Whether broker credentials are stored
    PoStatus,
}

impl Field {
    pub fn param_name(&self) -> &'static str {
        match self {
            Field::UserId => "user_id",
            Field::Language => "language",
            Field::Currency => "currency",
            Field::Plan => "plan",
            Field::PoStatus => "po_status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Translation key
    Key(&'static str),
    /// Shown as-is in every language
    Literal(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonSpec {
    pub label: Label,
    pub action: &'static str,
}

impl ButtonSpec {
    const fn key(key: &'static str, action: &'static str) -> Self {
        Self { label: Label::Key(key), action }
    }

    const fn literal(text: &'static str, action: &'static str) -> Self {
        Self { label: Label::Literal(text), action }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenDescriptor {
    pub id: &'static str,
    pub title_key: &'static str,
    pub body_key: &'static str,
    pub fields: &'static [Field],
    pub rows: &'static [&'static [ButtonSpec]],
}

pub static SCREENS: &[ScreenDescriptor] = &[
    ScreenDescriptor {
        id: HOME,
        title_key: "screens.home.title",
        body_key: "screens.home.body",
        fields: &[Field::UserId, Field::Language, Field::Currency, Field::Plan, Field::PoStatus],
        rows: &[
            &[ButtonSpec::key("buttons.menu", "nav:menu")],
            &[ButtonSpec::key("buttons.signal", "action:signal")],
            &[ButtonSpec::key("buttons.plans", "nav:plans")],
            &[ButtonSpec::key("buttons.settings", "nav:settings")],
        ],
    },
    ScreenDescriptor {
        id: MENU,
        title_key: "screens.menu.title",
        body_key: "screens.menu.body",
        fields: &[],
        rows: &[
            &[ButtonSpec::key("buttons.signal", "action:signal")],
            &[ButtonSpec::key("buttons.help", "nav:help"), ButtonSpec::key("buttons.bank", "nav:bank")],
            &[ButtonSpec::key("buttons.my_longs", "nav:my_longs"), ButtonSpec::key("buttons.my_stats", "nav:my_stats")],
            &[ButtonSpec::key("buttons.plans", "nav:plans")],
            &[ButtonSpec::key("buttons.settings", "nav:settings")],
        ],
    },
    ScreenDescriptor {
        id: HELP,
        title_key: "screens.help.title",
        body_key: "screens.help.body",
        fields: &[],
        rows: &[],
    },
    ScreenDescriptor {
        id: BANK,
        title_key: "screens.bank.title",
        body_key: "screens.bank.body",
        fields: &[Field::Plan],
        rows: &[
            &[ButtonSpec::key("plans.long", "plan:select:long")],
            &[ButtonSpec::key("plans.short", "plan:select:short")],
            &[ButtonSpec::key("plans.vip", "plan:select:vip")],
            &[ButtonSpec::key("buttons.plans", "nav:plans")],
        ],
    },
    ScreenDescriptor {
        id: MY_LONGS,
        title_key: "screens.my_longs.title",
        body_key: "screens.my_longs.body",
        fields: &[],
        rows: &[],
    },
    ScreenDescriptor {
        id: MY_STATS,
        title_key: "screens.my_stats.title",
        body_key: "screens.my_stats.body",
        fields: &[Field::Plan, Field::PoStatus],
        rows: &[],
    },
    ScreenDescriptor {
        id: PLANS,
        title_key: "screens.plans.title",
        body_key: "screens.plans.body",
        fields: &[Field::Plan],
        rows: &[
            &[ButtonSpec::key("plans.free", "plan:select:free")],
            &[ButtonSpec::key("plans.long", "plan:select:long")],
            &[ButtonSpec::key("plans.short", "plan:select:short")],
            &[ButtonSpec::key("plans.vip", "plan:select:vip")],
        ],
    },
    ScreenDescriptor {
        id: SETTINGS,
        title_key: "screens.settings.title",
        body_key: "screens.settings.body",
        fields: &[Field::Language, Field::Currency],
        rows: &[
            &[ButtonSpec::literal("RU", "set:lang:ru"), ButtonSpec::literal("EN", "set:lang:en")],
            &[
                ButtonSpec::literal("USD", "set:currency:USD"),
                ButtonSpec::literal("EUR", "set:currency:EUR"),
                ButtonSpec::literal("RUB", "set:currency:RUB"),
            ],
            &[ButtonSpec::key("buttons.set_po", "action:set_po")],
        ],
    },
];

pub fn find(screen: &str) -> Option<&'static ScreenDescriptor> {
    SCREENS.iter().find(|descriptor| descriptor.id == screen)
}

pub fn is_known(screen: &str) -> bool {
    find(screen).is_some()
}
