//! Stream copy implementation

use tracing::debug;

use crate::engine::{cut_inputs, cut_mappings, cut_trailer, EngineConfig};

/// Build the lossless trim: packets are copied, subtitles become `mov_text`.
///
/// The window should sit on keyframes, otherwise the first frames up to the
/// next keyframe may be unusable.
pub fn build_copy_cut_command(config: &EngineConfig) -> Vec<String> {
    let mut argv = cut_inputs(config);
    argv.extend(cut_mappings(config));
    argv.extend(
        ["-c:v", "copy", "-c:a", "copy", "-c:s", "mov_text"]
            .iter()
            .map(|s| s.to_string()),
    );
    argv.extend(cut_trailer(config));

    debug!("Stream copy cut: {} arguments", argv.len());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CutWindow;
    use crate::engine::SubtitleInput;

    #[test]
    fn test_copy_cut_without_subtitles() {
        let window = CutWindow::new(5.0, 10.0).unwrap();
        let argv = build_copy_cut_command(&EngineConfig::new("ffmpeg", "/tmp/a.mkv", "/tmp/a_cut.mp4", window));

        assert_eq!(
            &argv[..8],
            &["ffmpeg", "-y", "-ss", "5.000", "-to", "10.000", "-i", "/tmp/a.mkv"]
        );
        assert!(argv.windows(2).any(|w| w == ["-c:v", "copy"]));
        assert!(!argv.iter().any(|a| a == "-disposition:s:0"));
        assert_eq!(argv.last().unwrap(), "/tmp/a_cut.mp4");
    }

    #[test]
    fn test_copy_cut_with_subtitles() {
        let window = CutWindow::new(5.0, 10.0).unwrap();
        let config = EngineConfig::new("ffmpeg", "a.mkv", "a_cut.mp4", window).with_subtitles(vec![SubtitleInput {
            lang: "en".into(),
            path: "a.en.srt".into(),
        }]);
        let argv = build_copy_cut_command(&config);

        let srt_input = argv.iter().position(|a| a == "a.en.srt").unwrap();
        assert_eq!(argv[srt_input - 1], "-i");
        assert_eq!(argv[srt_input - 2], "srt");
        assert!(argv.windows(2).any(|w| w == ["-metadata:s:s:0", "language=en"]));
    }
}
