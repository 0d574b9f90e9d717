#![allow(dead_code)]

use wireup::Component;

#[derive(Component)]
struct Clock;

#[derive(Component)]
struct Scheduler {
    clock: Box<Clock>,
}

fn main() {}
