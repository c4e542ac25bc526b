use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", &self.0.to_string()[..8])
            }
        }
    };
}

define_id!(
    /// Unique identifier of a placed or generated building.
    BuildingId
);
define_id!(
    /// Unique identifier of a harvestable world resource.
    ResourceId
);
define_id!(
    /// Unique identifier of a crop plot.
    PlotId
);
define_id!(
    /// Unique identifier of a creature.
    CreatureId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_display_shows_short_form() {
        let id = CreatureId(Uuid::parse_str("a3f2b1c8-1234-5678-9abc-def012345678").unwrap());
        assert_eq!(id.to_string(), "a3f2b1c8");
    }

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(BuildingId::new(), BuildingId::new());
    }
}
