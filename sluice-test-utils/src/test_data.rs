// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::fruit::{Apple, Banana};
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fruit {
    Banana(Banana),
    Apple(Apple),
}

impl Fruit {
    #[must_use]
    pub const fn price(&self) -> u32 {
        match self {
            Self::Banana(banana) => banana.price,
            Self::Apple(apple) => apple.price,
        }
    }

    #[must_use]
    pub const fn is_apple(&self) -> bool {
        matches!(self, Self::Apple(_))
    }
}

impl Display for Fruit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Banana(banana) => Display::fmt(banana, f),
            Self::Apple(apple) => Display::fmt(apple, f),
        }
    }
}

impl From<Apple> for Fruit {
    fn from(apple: Apple) -> Self {
        Self::Apple(apple)
    }
}

impl From<Banana> for Fruit {
    fn from(banana: Banana) -> Self {
        Self::Banana(banana)
    }
}

#[must_use]
pub const fn banana(price: u32) -> Banana {
    Banana::new(price)
}

#[must_use]
pub const fn apple(price: u32) -> Apple {
    Apple::new(price)
}

#[must_use]
pub const fn fruit_banana(price: u32) -> Fruit {
    Fruit::Banana(Banana::new(price))
}

#[must_use]
pub const fn fruit_apple(price: u32) -> Fruit {
    Fruit::Apple(Apple::new(price))
}
