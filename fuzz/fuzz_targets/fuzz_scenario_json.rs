#![no_main]

use libfuzzer_sys::fuzz_target;
use spatnav_replay::report::replay;
use spatnav_replay::scenario::Scenario;

fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(scenario) = Scenario::from_json(text) else {
        return;
    };
    if scenario.elements.len() > 256 || scenario.steps.len() > 256 {
        return;
    }
    let config = scenario.config.clone();
    let _ = replay(&scenario, config);
});
