//! # Alarm Property Tests
//!
//! Randomised event sequences checked against the invariants of the alarm
//! state machine.

mod common;

use proptest::prelude::*;

use catpoint_core::{AlarmStatus, ArmingStatus, Sensor};
use catpoint_security::SecurityRepository;

use common::*;

#[derive(Debug, Clone)]
enum Event {
    Sensor { index: usize, active: bool },
    Image { threat: bool },
    Arm(ArmingStatus),
}

fn arming() -> impl Strategy<Value = ArmingStatus> {
    prop_oneof![
        Just(ArmingStatus::Disarmed),
        Just(ArmingStatus::ArmedHome),
        Just(ArmingStatus::ArmedAway),
    ]
}

fn alarm() -> impl Strategy<Value = AlarmStatus> {
    prop_oneof![
        Just(AlarmStatus::NoAlarm),
        Just(AlarmStatus::PendingAlarm),
        Just(AlarmStatus::Alarm),
    ]
}

fn event(sensors: usize) -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => (0..sensors, any::<bool>()).prop_map(|(index, active)| Event::Sensor { index, active }),
        1 => any::<bool>().prop_map(|threat| Event::Image { threat }),
        1 => arming().prop_map(Event::Arm),
    ]
}

fn fleet(active: &[bool]) -> Vec<Sensor> {
    active
        .iter()
        .enumerate()
        .map(|(i, a)| door(&format!("sensor-{i}")).with_active(*a))
        .collect()
}

/// Apply an event, fetching the sensor's stored copy first.
fn apply(svc: &mut Service, sensors: &[Sensor], ev: &Event) {
    match ev {
        Event::Sensor { index, active } => {
            let id = &sensors[*index];
            let mut current = svc
                .sensors()
                .unwrap()
                .into_iter()
                .find(|s| s == id)
                .unwrap();
            svc.change_sensor_activation_status(&mut current, *active)
                .unwrap();
        }
        Event::Image { threat } => svc.process_image(&frame_showing(*threat)).unwrap(),
        Event::Arm(status) => svc.set_arming_status(*status).unwrap(),
    }
}

proptest! {
    #[test]
    fn alarm_is_sticky_under_activations(
        active in proptest::collection::vec(any::<bool>(), 1..6),
        mode in arming(),
        activations in proptest::collection::vec(0usize..6, 1..20),
    ) {
        let sensors = fleet(&active);
        let repo = RecordingRepository::seeded(mode, AlarmStatus::Alarm, &sensors);
        let mut svc = service(repo, false);

        for i in activations {
            let idx = i % sensors.len();
            apply(&mut svc, &sensors, &Event::Sensor { index: idx, active: true });
            prop_assert_eq!(svc.alarm_status().unwrap(), AlarmStatus::Alarm);
        }
        prop_assert!(svc.repository().alarm_writes.is_empty());
    }

    #[test]
    fn disarm_always_clears(
        active in proptest::collection::vec(any::<bool>(), 0..6),
        start_arming in arming(),
        start_alarm in alarm(),
    ) {
        let repo = RecordingRepository::seeded(start_arming, start_alarm, &fleet(&active));
        let mut svc = service(repo, true);

        svc.set_arming_status(ArmingStatus::Disarmed).unwrap();
        prop_assert_eq!(svc.alarm_status().unwrap(), AlarmStatus::NoAlarm);
        prop_assert_eq!(svc.arming_status().unwrap(), ArmingStatus::Disarmed);
    }

    #[test]
    fn arming_leaves_every_sensor_inactive(
        active in proptest::collection::vec(any::<bool>(), 0..8),
        start_alarm in alarm(),
        armed in prop_oneof![Just(ArmingStatus::ArmedHome), Just(ArmingStatus::ArmedAway)],
    ) {
        let repo = RecordingRepository::seeded(ArmingStatus::Disarmed, start_alarm, &fleet(&active));
        let mut svc = service(repo, false);

        svc.set_arming_status(armed).unwrap();
        prop_assert!(svc.sensors().unwrap().iter().all(|s| !s.active));
        prop_assert_eq!(svc.alarm_status().unwrap(), start_alarm);
    }

    #[test]
    fn deactivation_from_alarm_yields_pending(
        active in proptest::collection::vec(any::<bool>(), 0..6),
        mode in arming(),
    ) {
        let mut tripped = window("tripped").with_active(true);
        let mut sensors = fleet(&active);
        sensors.push(tripped.clone());
        let repo = RecordingRepository::seeded(mode, AlarmStatus::Alarm, &sensors);
        let mut svc = service(repo, false);

        svc.change_sensor_activation_status(&mut tripped, false).unwrap();
        prop_assert_eq!(svc.repository().alarm_writes.clone(), vec![AlarmStatus::PendingAlarm]);
    }

    #[test]
    fn random_sequences_keep_invariants(
        active in proptest::collection::vec(any::<bool>(), 1..5),
        start_arming in arming(),
        start_alarm in alarm(),
        events in proptest::collection::vec(event(4), 1..40),
    ) {
        let sensors = fleet(&active);
        let repo = RecordingRepository::seeded(start_arming, start_alarm, &sensors);
        let mut svc = service(repo, false);

        for ev in &events {
            let ev = match ev {
                Event::Sensor { index, active } => Event::Sensor { index: index % sensors.len(), active: *active },
                other => other.clone(),
            };
            apply(&mut svc, &sensors, &ev);
            let alarm_now = svc.alarm_status().unwrap();
            let arming_now = svc.arming_status().unwrap();
            if let Event::Arm(ArmingStatus::Disarmed) = ev {
                prop_assert_eq!(alarm_now, AlarmStatus::NoAlarm);
            }
            if let Event::Arm(status) = ev {
                if status.is_armed() {
                    prop_assert!(svc.sensors().unwrap().iter().all(|s| !s.active));
                }
                prop_assert_eq!(arming_now, status);
            }
            prop_assert_eq!(svc.repository().inner.sensors().unwrap().len(), sensors.len());
        }
    }
}
