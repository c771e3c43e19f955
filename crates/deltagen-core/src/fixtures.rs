//! Record types shared by the unit tests.

crate::record! {
    pub struct Item => ItemDelta {
        scalars { name: String, count: u32, price: f64 }
    }
}

crate::record! {
    pub struct Stats => StatsDelta {
        scalars { wins: u32, losses: u32 }
    }
}

crate::record! {
    pub root struct Player => PlayerDelta {
        scalars { name: String, level: u16, active: bool }
        records { stats: Stats }
        maps { items: u64 => Item, friends: String => Stats }
    }
}

crate::record! {
    pub struct Node => NodeDelta {
        scalars { label: String }
        maps { children: u32 => Node }
    }
}

crate::record! {
    pub struct Marker => MarkerDelta {}
}

pub fn item(name: &str, count: u32) -> Item {
    Item {
        name: name.to_string(),
        count,
        price: 0.0,
    }
}

impl Player {
    pub fn sample() -> Self {
        Self {
            name: "mira".into(),
            level: 3,
            active: true,
            stats: Stats { wins: 5, losses: 2 },
            items: [
                (1, item("sword", 1)),
                (2, item("shield", 1)),
                (3, item("potion", 4)),
            ]
            .into_iter()
            .collect(),
            friends: [("ada".to_string(), Stats { wins: 3, losses: 2 })]
                .into_iter()
                .collect(),
        }
    }
}

impl Node {
    pub fn named(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Default::default()
        }
    }
}
