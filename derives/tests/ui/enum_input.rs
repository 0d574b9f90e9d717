#![allow(dead_code)]

use wireup::Component;

#[derive(Component)]
enum Clock {
    Wall,
    Monotonic,
}

fn main() {}
