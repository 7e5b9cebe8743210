//! Command-line analysis of a single image or keypoint file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use vitruvian_core::analyzer::{AnalyzerOptions, LabelStyle, MissingLandmarks};
use vitruvian_core::detector::InferenceOptions;
use vitruvian_core::image_meta::{read_dimensions, validate_upload};
use vitruvian_core::labels::MetricStatus;
use vitruvian_core::{AnalysisResult, ImageSize, Keypoint, ProportionAnalyzer};
use vitruvian_posenet::PoseNetApi;

#[derive(Debug, Parser)]
#[command(name = "vitruvian")]
#[command(author, version, about = "Score a pose against Vitruvian Man proportions")]
pub struct Cli {
    /// Image to analyze, or a `.json` file with detected keypoints
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the full result as pretty JSON to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the full JSON result instead of the report text
    #[arg(short, long)]
    pub verbose: bool,

    /// Base URL of the pose estimation service (images only)
    #[arg(long, env = "POSE_SERVICE_URL", value_name = "URL")]
    pub detector_url: Option<String>,

    /// Fail instead of scoring when a required landmark is missing
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    pub fn analyzer(&self) -> ProportionAnalyzer {
        ProportionAnalyzer::new(AnalyzerOptions {
            label_style: LabelStyle::Report,
            missing_landmarks: if self.strict {
                MissingLandmarks::Reject
            } else {
                MissingLandmarks::Propagate
            },
        })
    }
}

/// What kind of file the user handed us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    Keypoints(&'a Path),
    Image(&'a Path),
}

impl<'a> Input<'a> {
    pub fn classify(path: &'a Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::Keypoints(path)
        } else {
            Self::Image(path)
        }
    }
}

/// Same shape as the body of `POST /api/analyze/keypoints`.
#[derive(Debug, Deserialize)]
pub struct KeypointsFile {
    pub keypoints: Vec<Keypoint>,
    pub image_width: u32,
    pub image_height: u32,
}

impl KeypointsFile {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("keypoint file is not valid JSON")
    }

    pub fn image_size(&self) -> ImageSize {
        ImageSize::new(self.image_width, self.image_height)
    }
}

/// Run the analysis for `cli.input`.
pub async fn analyze(cli: &Cli) -> Result<AnalysisResult> {
    let analyzer = cli.analyzer();

    match Input::classify(&cli.input) {
        Input::Keypoints(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file = KeypointsFile::parse(&text)?;
            tracing::debug!(keypoints = file.keypoints.len(), "Loaded keypoint file");

            Ok(analyzer.analyze(&file.keypoints, file.image_size())?)
        }
        Input::Image(path) => {
            let Some(url) = cli.detector_url.as_deref() else {
                bail!("analyzing an image needs --detector-url or POSE_SERVICE_URL");
            };

            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            validate_upload(&filename, None)?;

            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let size = read_dimensions(&bytes)?;

            let detector = PoseNetApi::new(url)
                .connect()
                .await
                .with_context(|| format!("pose service at {url} is not reachable"))?;
            let keypoints = detector
                .estimate_single_pose(&bytes, &InferenceOptions::default())
                .await?
                .filter(|kps| !kps.is_empty());

            match keypoints {
                Some(kps) => Ok(analyzer.analyze(&kps, size)?),
                None => bail!("No human pose detected in image"),
            }
        }
    }
}

/// Text printed to stdout: the JSON result when verbose, otherwise the
/// report followed by the tier and a status per headline metric.
pub fn render(result: &AnalysisResult, verbose: bool) -> Result<String> {
    if verbose {
        return Ok(serde_json::to_string_pretty(result)?);
    }

    let mut text = result.analysis.trim_end().to_string();
    let tier = result.tier();
    write!(text, "\n\nTier: {} - {}", tier.level(), tier.description())?;
    for (name, value, ideal) in result.metrics() {
        let status = MetricStatus::evaluate(value, ideal);
        write!(text, "\n- {name}: {value:.3} ({})", status.label())?;
    }
    Ok(text)
}

/// Save the result to `-o` when given, otherwise render it. Returns what to
/// print.
pub async fn emit(result: &AnalysisResult, cli: &Cli) -> Result<String> {
    let Some(path) = &cli.output else {
        return render(result, cli.verbose);
    };

    let json = serde_json::to_string_pretty(result)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote analysis");

    Ok(format!("Results saved to {}", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use tempfile::NamedTempFile;

    use super::*;

    /// Upright mirrored figure in a 1000x1000 frame, arms out.
    const STANDING_FIGURE: &str = r#"{"keypoints": [
        {"position": {"x": 500, "y": 100}, "score": 0.9},
        {"position": {"x": 0, "y": 0}, "score": 0.05},
        {"position": {"x": 0, "y": 0}, "score": 0.05},
        {"position": {"x": 0, "y": 0}, "score": 0.05},
        {"position": {"x": 0, "y": 0}, "score": 0.05},
        {"position": {"x": 420, "y": 200}, "score": 0.9},
        {"position": {"x": 580, "y": 200}, "score": 0.9},
        {"position": {"x": 260, "y": 200}, "score": 0.9},
        {"position": {"x": 740, "y": 200}, "score": 0.9},
        {"position": {"x": 100, "y": 200}, "score": 0.9},
        {"position": {"x": 900, "y": 200}, "score": 0.9},
        {"position": {"x": 440, "y": 440}, "score": 0.9},
        {"position": {"x": 560, "y": 440}, "score": 0.9},
        {"position": {"x": 450, "y": 670}, "score": 0.9},
        {"position": {"x": 550, "y": 670}, "score": 0.9},
        {"position": {"x": 460, "y": 900}, "score": 0.9},
        {"position": {"x": 540, "y": 900}, "score": 0.9}
    ], "image_width": 1000, "image_height": 1000}"#;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn temp_with(suffix: &str, contents: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn parse_minimal_args() {
        let cli = parse(&["vitruvian", "pose.png"]);

        assert_eq!(cli.input, PathBuf::from("pose.png"));
        assert!(cli.output.is_none());
        assert!(!cli.verbose);
        assert!(!cli.strict);
    }

    #[test]
    fn parse_all_args() {
        let cli = parse(&[
            "vitruvian",
            "pose.jpg",
            "-o",
            "result.json",
            "-v",
            "--detector-url",
            "http://localhost:8500",
            "--strict",
        ]);

        assert_eq!(cli.output, Some(PathBuf::from("result.json")));
        assert!(cli.verbose);
        assert_eq!(cli.detector_url.as_deref(), Some("http://localhost:8500"));
        assert_eq!(
            cli.analyzer().options().missing_landmarks,
            MissingLandmarks::Reject
        );
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["vitruvian"]).is_err());
    }

    #[test]
    fn classify_by_extension() {
        assert_eq!(
            Input::classify(Path::new("pose.JSON")),
            Input::Keypoints(Path::new("pose.JSON"))
        );
        assert_eq!(
            Input::classify(Path::new("pose.png")),
            Input::Image(Path::new("pose.png"))
        );
        assert_eq!(
            Input::classify(Path::new("json")),
            Input::Image(Path::new("json"))
        );
    }

    #[test]
    fn keypoints_file_parses() {
        let file = KeypointsFile::parse(
            r#"{"keypoints": [{"position": {"x": 1, "y": 2}, "score": 0.5}],
                "image_width": 640, "image_height": 480}"#,
        )
        .unwrap();

        assert_eq!(file.keypoints.len(), 1);
        assert_eq!(file.image_size(), ImageSize::new(640, 480));
    }

    #[test]
    fn keypoints_file_rejects_garbage() {
        let err = KeypointsFile::parse("[1, 2, 3]").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn keypoint_file_is_analyzed_with_report() {
        let file = temp_with(
            ".json",
            br#"{"keypoints": [
                {"position": {"x": 200, "y": 50}, "score": 0.9},
                {"position": {"x": 0, "y": 0}, "score": 0.0}
            ], "image_width": 400, "image_height": 500}"#,
        );

        let cli = parse(&["vitruvian", file.path().to_str().unwrap()]);
        let result = analyze(&cli).await.unwrap();

        assert!(result.analysis.starts_with("Vitruvian Man Analysis: "));
        let text = render(&result, false).unwrap();
        assert!(text.starts_with(result.analysis.trim_end()));
        assert!(render(&result, true).unwrap().contains("\"vitruvian_score\""));
    }

    #[tokio::test]
    async fn report_ends_with_tier_and_metric_status() {
        let file = temp_with(".json", STANDING_FIGURE.as_bytes());
        let cli = parse(&["vitruvian", file.path().to_str().unwrap()]);
        let result = analyze(&cli).await.unwrap();

        let text = render(&result, false).unwrap();
        assert!(
            text.contains("\n\nTier: Renaissance Master - Extraordinary proportional harmony"),
            "got: {text}"
        );
        assert!(text.contains("\n- Head ratio: 0.125 (Excellent)"), "got: {text}");
        assert!(text.ends_with("\n- Square fit: 1.000 (Excellent)"), "got: {text}");
    }

    #[tokio::test]
    async fn output_flag_saves_json_and_reports_path() {
        let input = temp_with(".json", STANDING_FIGURE.as_bytes());
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("result.json");

        let cli = parse(&[
            "vitruvian",
            input.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "-v",
        ]);
        let result = analyze(&cli).await.unwrap();
        let printed = emit(&result, &cli).await.unwrap();

        assert_eq!(printed, format!("Results saved to {}", out.display()));
        let saved: AnalysisResult =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert!((saved.vitruvian_score - result.vitruvian_score).abs() < 1e-9);
        assert_eq!(saved.analysis, result.analysis);
    }

    #[tokio::test]
    async fn without_output_flag_emit_renders() {
        let input = temp_with(".json", STANDING_FIGURE.as_bytes());
        let cli = parse(&["vitruvian", input.path().to_str().unwrap()]);
        let result = analyze(&cli).await.unwrap();

        assert_eq!(emit(&result, &cli).await.unwrap(), render(&result, false).unwrap());
    }

    #[tokio::test]
    async fn strict_mode_reports_missing_landmarks() {
        let file = temp_with(
            ".json",
            br#"{"keypoints": [{"position": {"x": 200, "y": 50}, "score": 0.9}],
                "image_width": 400, "image_height": 500}"#,
        );

        let cli = parse(&["vitruvian", file.path().to_str().unwrap(), "--strict"]);
        let result = analyze(&cli).await;

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("leftShoulder"), "got: {message}");
    }

    #[tokio::test]
    async fn image_without_detector_url_is_refused() {
        let cli = Cli {
            input: PathBuf::from("pose.png"),
            output: None,
            verbose: false,
            detector_url: None,
            strict: false,
        };

        let err = analyze(&cli).await.unwrap_err();
        assert!(err.to_string().contains("--detector-url"));
    }

    #[tokio::test]
    async fn non_image_file_is_refused_before_detection() {
        let mut png = Cursor::new(Vec::new());
        image::RgbImage::new(4, 4)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();
        let file = temp_with(".txt", &png.into_inner());

        let cli = Cli {
            input: file.path().to_path_buf(),
            output: None,
            verbose: false,
            detector_url: Some("http://127.0.0.1:9".into()),
            strict: false,
        };
        let message = analyze(&cli).await.unwrap_err().to_string();
        assert!(message.contains("Unsupported file extension"), "got: {message}");
    }
}
