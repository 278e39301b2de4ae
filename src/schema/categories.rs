//! Nested counter categories of a player record

/// A nested counter mapping in the player record (e.g. `damage_dealt: {"p61": 120, ...}`)
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// JSON field of the player record, also the column prefix
    pub name: &'static str,
    /// Whether counter codes are replaced by display names in column keys
    pub resolve_names: bool,
    /// Counter codes of the published sink header, in column order
    pub known_codes: &'static [&'static str],
}

impl Category {
    pub const fn raw(name: &'static str, known_codes: &'static [&'static str]) -> Self {
        Self {
            name,
            resolve_names: false,
            known_codes,
        }
    }

    pub const fn named(name: &'static str, known_codes: &'static [&'static str]) -> Self {
        Self {
            name,
            resolve_names: true,
            known_codes,
        }
    }

    /// Column key of the synthesized sum
    pub fn total_column(&self) -> String {
        format!("{}_total", self.name)
    }
}

const GAME_MODES: &[&str] = &["m00", "m10", "m09", "m08", "m07"];

pub static WINS: Category = Category::raw("wins", GAME_MODES);

pub static LOSSES: Category = Category::raw("losses", GAME_MODES);

pub static SELF_DESTRUCTS: Category = Category::raw("self_destructs", &["v30", "v40", "v41", "v20"]);

pub static DISTANCE_DRIVEN: Category = Category::raw(
    "distance_driven",
    &[
        "v10", "v30", "v00", "v40", "v41", "v20", "v21", "v01", "v11", "v02", "v22", "v12", "v23",
        "v13", "v60",
    ],
);

pub static DISTANCE_DRIVEN_COUNT: Category = Category::raw(
    "distance_driven_count",
    &[
        "v10", "v30", "v00", "v40", "v41", "v20", "v21", "v01", "v11", "v02", "v22", "v12", "v23",
        "v13", "v60",
    ],
);

pub static KILLS_PER_VEHICLE: Category = Category::raw(
    "kills_per_vehicle",
    &[
        "v30", "v00", "v10", "v40", "v01", "v21", "v02", "v22", "v12", "v11", "v41", "v20", "v13",
        "v50", "v60",
    ],
);

pub static SHOTS_FIRED_UNZOOMED: Category = Category::raw(
    "shots_fired_unzoomed",
    &[
        "p11", "p53", "p93", "p64", "p90", "p75", "p52", "p61", "p71", "p83", "p84", "p09", "p62",
        "p85", "p86", "p63", "p92", "p65", "p54", "p55", "p82", "p56", "p57", "p67", "p80", "p60",
        "p59", "p94", "p87", "p66", "p88", "p68", "p78", "p79", "p89", "p74", "p69", "p95", "p111",
        "p98", "p101", "p112", "p97", "p105", "p96", "p110", "p103", "p104", "p126",
    ],
);

pub static SHOTS_FIRED_ZOOMED: Category = Category::raw(
    "shots_fired_zoomed",
    &[
        "p61", "p64", "p93", "p53", "p75", "p52", "p74", "p82", "p62", "p92", "p65", "p57", "p84",
        "p66", "p55", "p56", "p63", "p67", "p58", "p80", "p60", "p59", "p90", "p85", "p94", "p87",
        "p54", "p68", "p86", "p88", "p69", "p89", "p91", "p83", "p98", "p112", "p79", "p97", "p105",
        "p96", "p101", "p71", "p104", "p126",
    ],
);

pub static SHOTS_HIT_UNZOOMED: Category = Category::raw(
    "shots_hit_unzoomed",
    &[
        "p53", "p11", "p93", "p90", "p52", "p61", "p83", "p62", "p09", "p86", "p92", "p54", "p65",
        "p63", "p55", "p56", "p71", "p57", "p67", "p58", "p80", "p76", "p60", "p85", "p94", "p66",
        "p59", "p75", "p78", "p88", "p68", "p89", "p79", "p84", "p87", "p82", "p69", "p91", "p95",
        "p64", "p111", "p98", "p101", "p112", "p97", "p105", "p96", "p110", "p104", "p103", "p126",
    ],
);

pub static SHOTS_HIT_ZOOMED: Category = Category::raw(
    "shots_hit_zoomed",
    &[
        "p93", "p64", "p61", "p75", "p52", "p82", "p62", "p92", "p57", "p53", "p84", "p56", "p63",
        "p67", "p58", "p60", "p59", "p90", "p85", "p87", "p65", "p54", "p94", "p68", "p55", "p89",
        "p91", "p74", "p78", "p66", "p95", "p86", "p83", "p80", "p98", "p112", "p79", "p97", "p105",
        "p96", "p104", "p71", "p126",
    ],
);

/// The only category whose codes are shown as weapon names
pub static DAMAGE_DEALT: Category = Category::named(
    "damage_dealt",
    &[
        "p11", "p53", "p61", "p64", "p93", "p75", "p90", "p52", "p82", "p83", "p09", "p62", "p86",
        "p92", "p54", "p65", "p57", "p55", "p84", "p56", "p71", "p63", "p67", "p58", "p80", "p76",
        "p60", "p59", "p85", "p94", "p87", "p66", "p78", "p88", "p68", "p79", "p89", "p91", "p74",
        "p69", "p95", "p111", "p98", "p101", "p112", "p97", "p105", "p96", "p110", "p103", "p104",
        "p126",
    ],
);

pub static DAMAGE_RECEIVED: Category = Category::raw(
    "damage_received",
    &[
        "p57", "p61", "p93", "p67", "p82", "p68", "p55", "p52", "p69", "p75", "p62", "p71", "p65",
        "p64", "p79", "p86", "p58", "p09", "p11", "p92", "p90", "p83", "p80", "p56", "p54", "p53",
        "p78", "p66", "p91", "p59", "p94", "p63", "p60", "p76", "p88", "p89", "p84", "p74", "p85",
        "p87", "p95", "p111", "p98", "p112", "p101", "p97", "p105", "p96", "p110", "p103", "p104",
        "p126",
    ],
);

pub static KILLS_PER_WEAPON: Category = Category::raw(
    "kills_per_weapon",
    &[
        "p93", "p64", "p75", "p61", "p90", "p11", "p09", "p62", "p92", "p52", "p53", "p84", "p55",
        "p63", "p57", "p58", "p67", "p76", "p80", "p71", "p60", "p59", "p56", "p86", "p94", "p66",
        "p83", "p65", "p54", "p68", "p79", "p89", "p78", "p91", "p82", "p85", "p74", "p69", "p87",
        "p88", "p95", "p111", "p98", "p101", "p97", "p112", "p105", "p96", "p104", "p126", "p110",
    ],
);

pub static DEATHS: Category = Category::raw(
    "deaths",
    &[
        "p67", "p68", "p55", "p75", "p62", "p93", "p64", "p79", "p69", "p58", "p11", "p61", "p92",
        "p90", "p71", "p09", "p57", "p78", "p52", "p66", "p94", "p53", "p65", "p63", "p80", "p88",
        "p89", "p76", "p59", "p60", "p91", "p56", "p84", "p85", "p54", "p86", "p83", "p95", "p111",
        "p98", "p74", "p112", "p101", "p97", "p87", "p105", "p96", "p103", "p104", "p126",
    ],
);

pub static HEADSHOTS: Category = Category::raw(
    "headshots",
    &[
        "p64", "p93", "p53", "p62", "p90", "p84", "p61", "p63", "p57", "p67", "p59", "p56", "p94",
        "p66", "p75", "p78", "p68", "p89", "p79", "p91", "p87", "p74", "p52", "p55", "p95", "p58",
        "p98", "p97", "p105", "p96", "p104", "p126",
    ],
);

/// All categories in row order
pub static ALL_CATEGORIES: &[&Category] = &[
    &WINS,
    &LOSSES,
    &SELF_DESTRUCTS,
    &DISTANCE_DRIVEN,
    &DISTANCE_DRIVEN_COUNT,
    &KILLS_PER_VEHICLE,
    &SHOTS_FIRED_UNZOOMED,
    &SHOTS_FIRED_ZOOMED,
    &SHOTS_HIT_UNZOOMED,
    &SHOTS_HIT_ZOOMED,
    &DAMAGE_DEALT,
    &DAMAGE_RECEIVED,
    &KILLS_PER_WEAPON,
    &DEATHS,
    &HEADSHOTS,
];

/// Look up a category by its record field name
pub fn get_category(name: &str) -> Option<&'static Category> {
    ALL_CATEGORIES.iter().copied().find(|c| c.name == name)
}
