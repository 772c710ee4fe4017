#![cfg(target_arch = "wasm32")]

use sphere_burst_engine::Simulation;
use wasm_bindgen_test::*;

const CUBE: [f32; 24] = [
    -1.0, -1.0, -1.0, 1.0, -1.0, -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0,
    -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
];

#[wasm_bindgen_test]
fn facade_runs_a_burst() {
    let mut sim = Simulation::new(r#"{ "particleCount": 8, "multithreaded": false }"#, &CUBE).unwrap();
    assert_eq!(sim.particle_count(), 8);
    assert_eq!(sim.instances_len(), 8 * 16);
    assert_eq!(sim.positions_len(), 8 * 3);

    sim.set_trigger(0.0, 0.0, 0.0);
    sim.request_activation();
    sim.step(0.005).unwrap();

    assert_eq!(sim.take_activation_completed(), Some(8));
    assert!(sim.next_event_json().unwrap().contains("completionReached"));
    assert_eq!(sim.next_event_json(), None);
    assert_eq!(sim.active_fraction(), 1.0);

    sim.rebuild().unwrap();
    assert_eq!(sim.active_fraction(), 0.0);
    assert_eq!(sim.tick(), 0);
}

#[wasm_bindgen_test]
fn facade_rejects_bad_config() {
    assert!(Simulation::new(r#"{ "particleCount": 0 }"#, &CUBE).is_err());
    assert!(Simulation::new("{}", &[]).is_err());
}
