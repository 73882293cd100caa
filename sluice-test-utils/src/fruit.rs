// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Banana {
    pub price: u32,
}

impl Banana {
    #[must_use]
    pub const fn new(price: u32) -> Self {
        Self { price }
    }
}

impl Display for Banana {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Banana[price={}]", self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Apple {
    pub price: u32,
}

impl Apple {
    #[must_use]
    pub const fn new(price: u32) -> Self {
        Self { price }
    }
}

impl Display for Apple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Apple[price={}]", self.price)
    }
}
