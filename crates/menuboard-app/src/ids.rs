// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

macro_rules! index_id {
    ($name:ident, $repr:ty) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name($repr);

        impl $name {
            pub const fn new(value: $repr) -> Self {
                Self(value)
            }

            pub const fn get(self) -> $repr {
                self.0
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }
    };
}

// Position of a category in tab order.
index_id!(CategoryId, usize);
// Identifies one pending tab switch; a newer switch makes older tokens stale.
index_id!(TransitionToken, u64);

impl TransitionToken {
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
