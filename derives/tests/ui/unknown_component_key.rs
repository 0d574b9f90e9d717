#![allow(dead_code)]

use wireup::Component;

#[derive(Component)]
#[component(singleton)]
struct Clock;

fn main() {}
