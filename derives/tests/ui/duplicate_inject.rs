#![allow(dead_code)]

use std::sync::Arc;

use wireup::Component;

#[derive(Component)]
struct Clock;

#[derive(Component)]
struct Scheduler {
    #[inject(Clock)]
    #[inject(Clock)]
    clock: Arc<Clock>,
}

fn main() {}
