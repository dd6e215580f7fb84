#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::AudioConfig;
    use crate::sound::{AudioState, bass_note, melody_note};

    fn quiet_config() -> AudioConfig {
        AudioConfig {
            music_enabled: false,
            volume: 0.5,
        }
    }

    #[test]
    fn test_audiostate_creation() {
        let audio_state = AudioState::new(&quiet_config());
        assert!((audio_state.get_volume() - 0.5).abs() < f32::EPSILON);
        assert!(!audio_state.is_music_enabled());
    }

    #[test]
    fn test_volume_adjustment() {
        let mut audio_state = AudioState::new(&quiet_config());

        audio_state.set_volume(0.8);
        assert!((audio_state.get_volume() - 0.8).abs() < f32::EPSILON);

        audio_state.set_volume(1.5);
        assert!((audio_state.get_volume() - 1.0).abs() < f32::EPSILON);

        audio_state.set_volume(-0.5);
        assert!(audio_state.get_volume().abs() < f32::EPSILON);
    }

    #[test]
    fn test_initial_volume_is_clamped() {
        let audio_state = AudioState::new(&AudioConfig {
            music_enabled: false,
            volume: 3.0,
        });
        assert!((audio_state.get_volume() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_play_and_stop_music() {
        let mut audio_state = AudioState::new(&quiet_config());

        audio_state.play_music();
        assert!(audio_state.is_music_enabled());

        audio_state.stop_music();
        assert!(!audio_state.is_music_enabled());

        // Small delay to allow thread communication
        std::thread::sleep(Duration::from_millis(10));
    }

    #[test]
    fn test_toggle_music() {
        let mut audio_state = AudioState::new(&quiet_config());

        let initial_state = audio_state.is_music_enabled();
        audio_state.toggle_music();
        assert_eq!(audio_state.is_music_enabled(), !initial_state);

        audio_state.toggle_music();
        assert_eq!(audio_state.is_music_enabled(), initial_state);
    }

    #[test]
    fn test_melody_starts_on_first_note() {
        let (freq, gate) = melody_note(0.0);
        assert!((freq - 659.25).abs() < f32::EPSILON);
        assert!((gate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_melody_gap_between_notes() {
        // First note lasts two beats of 0.25s; the last 30ms are silent
        let (_, gate) = melody_note(0.49);
        assert!(gate.abs() < f32::EPSILON);
    }

    #[test]
    fn test_melody_loops() {
        assert_eq!(melody_note(0.1), melody_note(0.1 + 10.0));
    }

    #[test]
    fn test_bass_note_is_always_audible() {
        for step in 0..200 {
            let t = step as f32 * 0.1;
            assert!(bass_note(t) > 0.0);
        }
    }
}
