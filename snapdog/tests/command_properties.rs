//! Property tests for command handlers

mod common;

use proptest::prelude::*;
use snapdog::SnapDogConfig;
use snapdog_state::{ZoneIndex, MAX_VOLUME};

#[derive(Debug, Clone)]
enum VolumeCommand {
    Set(i32),
    Up(u8),
    Down(u8),
    ToggleMute,
}

fn command_strategy() -> impl Strategy<Value = VolumeCommand> {
    prop_oneof![
        (-50i32..200).prop_map(VolumeCommand::Set),
        any::<u8>().prop_map(VolumeCommand::Up),
        any::<u8>().prop_map(VolumeCommand::Down),
        Just(VolumeCommand::ToggleMute),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Volume stays in range, each command commits exactly one version, and
    /// muting never loses the configured volume.
    #[test]
    fn volume_commands_keep_invariants(commands in prop::collection::vec(command_strategy(), 1..25)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let (snapdog, _recorder, _clock) = common::start_recording(SnapDogConfig::no_debounce());
            let zones = snapdog.zones();
            let zone = ZoneIndex::new(1);

            for (i, command) in commands.iter().enumerate() {
                let before = snapdog.store().current().zone(zone).unwrap().volume;
                let state = match command {
                    VolumeCommand::Set(v) => zones.set_volume(zone, *v).await.unwrap(),
                    VolumeCommand::Up(step) => zones.volume_up(zone, *step).await.unwrap(),
                    VolumeCommand::Down(step) => zones.volume_down(zone, *step).await.unwrap(),
                    VolumeCommand::ToggleMute => {
                        let state = zones.toggle_mute(zone).await.unwrap();
                        assert_eq!(state.volume, before);
                        state
                    }
                };

                assert!(state.volume <= MAX_VOLUME);
                if state.mute {
                    assert_eq!(state.effective_volume(), 0);
                }
                assert_eq!(snapdog.store().version(), i as u64 + 1);
            }

            snapdog.shutdown().await;
        });
    }
}
