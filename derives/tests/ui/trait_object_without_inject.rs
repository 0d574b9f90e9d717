#![allow(dead_code)]

use std::sync::Arc;

use wireup::Component;

trait Clock: Send + Sync {}

#[derive(Component)]
struct Scheduler {
    clock: Arc<dyn Clock>,
}

fn main() {}
