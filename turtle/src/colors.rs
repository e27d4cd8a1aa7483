// pathfinder/turtle/src/colors.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::pose::ColorPercent;

pub static NAMED_COLORS: &'static [(&'static str, ColorPercent)] = &[
    ("aqua", ColorPercent::new(0.0, 100.0, 100.0)),
    ("black", ColorPercent::new(0.0, 0.0, 0.0)),
    ("blue", ColorPercent::new(0.0, 0.0, 100.0)),
    // CSS "saddlebrown"; CSS brown is too red and dark.
    ("brown", ColorPercent::new(74.0, 56.0, 56.0)),
    ("gray", ColorPercent::new(50.0, 50.0, 50.0)),
    ("green", ColorPercent::new(0.0, 50.0, 0.0)),
    ("fuschia", ColorPercent::new(100.0, 0.0, 100.0)),
    ("lime", ColorPercent::new(0.0, 100.0, 0.0)),
    ("maroon", ColorPercent::new(50.0, 0.0, 0.0)),
    ("navy", ColorPercent::new(0.0, 0.0, 50.0)),
    ("olive", ColorPercent::new(50.0, 50.0, 0.0)),
    ("orange", ColorPercent::new(100.0, 65.0, 0.0)),
    ("purple", ColorPercent::new(50.0, 0.0, 50.0)),
    ("red", ColorPercent::new(100.0, 0.0, 0.0)),
    ("silver", ColorPercent::new(75.0, 75.0, 75.0)),
    ("tan", ColorPercent::new(82.0, 71.0, 55.0)),
    ("teal", ColorPercent::new(0.0, 50.0, 50.0)),
    ("white", ColorPercent::new(100.0, 100.0, 100.0)),
    ("yellow", ColorPercent::new(100.0, 100.0, 0.0)),
];

pub fn named(name: &str) -> Option<ColorPercent> {
    NAMED_COLORS
        .iter()
        .find(|&&(candidate, _)| candidate == name)
        .map(|&(_, color)| color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(named("red"), Some(ColorPercent::new(100.0, 0.0, 0.0)));
        assert_eq!(named("silver"), Some(ColorPercent::new(75.0, 75.0, 75.0)));
        assert_eq!(named("Red"), None);
        assert_eq!(NAMED_COLORS.len(), 19);
    }
}
