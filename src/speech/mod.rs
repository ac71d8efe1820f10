use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::tempdir;
use tracing::info;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::languages::Lang;

const WHISPER_MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Whisper context loaded once at startup and shared across requests.
/// Each transcription creates its own state; the context itself is
/// immutable after load.
pub struct WhisperEngine {
    ctx: WhisperContext,
}

impl WhisperEngine {
    pub async fn load(model: Option<&str>) -> Result<Self> {
        let model_path = whisper_model_path(model).await?;
        info!("loading whisper model: {}", model_path.display());
        let path = model_path.to_string_lossy();
        let ctx = WhisperContext::new_with_params(path.as_ref(), WhisperContextParameters::default())
            .with_context(|| "failed to load whisper model")?;
        Ok(Self { ctx })
    }

    /// Transcribes a 16 kHz mono WAV with a fixed language. The
    /// backend never auto-detects: callers must name the language.
    pub fn transcribe(&self, wav_path: &Path, language: Lang) -> Result<String> {
        let audio = read_wav_mono_f32(wav_path)?;

        let mut state = self
            .ctx
            .create_state()
            .with_context(|| "failed to init whisper state")?;
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(num_cpus::get() as i32);
        params.set_translate(false);
        params.set_language(Some(language.whisper_code()));

        state
            .full(params, &audio[..])
            .with_context(|| "whisper transcription failed")?;

        let num_segments = state
            .full_n_segments()
            .with_context(|| "failed to read segments")?;
        let mut parts = Vec::new();
        for idx in 0..num_segments {
            let text = state
                .full_get_segment_text(idx)
                .with_context(|| "failed to read segment text")?;
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        Ok(parts.join(" "))
    }
}

/// Writes uploaded audio bytes into `dir` and converts them to the
/// 16 kHz mono WAV Whisper expects.
pub fn prepare_wav(audio_bytes: &[u8], input_ext: &str, dir: &Path) -> Result<PathBuf> {
    ensure_command("ffmpeg", "speech endpoints require ffmpeg")?;

    let (input_path, wav_path) = conversion_paths(dir, input_ext);
    fs::write(&input_path, audio_bytes).with_context(|| "failed to write audio input")?;

    run_ffmpeg(&[
        "-y",
        "-i",
        input_path.to_string_lossy().as_ref(),
        "-ar",
        "16000",
        "-ac",
        "1",
        wav_path.to_string_lossy().as_ref(),
    ])
    .with_context(|| "failed to decode audio with ffmpeg")?;
    Ok(wav_path)
}

/// ffmpeg refuses to write its output over the input file, so the
/// converted WAV never shares the upload's name, even for wav uploads.
fn conversion_paths(dir: &Path, input_ext: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("input.{}", input_ext)),
        dir.join("converted.wav"),
    )
}

/// Synthesizes speech and persists the WAV under `tmp_dir`, returning
/// the kept path. The caller owns cleanup of the returned file.
pub fn synthesize_to_temp(text: &str, language: Lang, tmp_dir: &Path) -> Result<String> {
    let scratch = tempdir().with_context(|| "failed to create temp dir for tts")?;
    let wav_path = scratch.path().join("tts.wav");
    synthesize_speech(text, language, &wav_path)?;
    let bytes = fs::read(&wav_path).with_context(|| "failed to read synthesized audio")?;

    fs::create_dir_all(tmp_dir)
        .with_context(|| format!("failed to create tmp dir: {}", tmp_dir.display()))?;
    let file = tempfile::Builder::new()
        .prefix("transly-tts-")
        .suffix(".wav")
        .tempfile_in(tmp_dir)?;
    fs::write(file.path(), &bytes).with_context(|| "failed to write tts output")?;
    let temp_path = file.into_temp_path();
    let path = temp_path
        .keep()
        .with_context(|| "failed to persist tts output")?;
    Ok(path.to_string_lossy().to_string())
}

fn synthesize_speech(text: &str, language: Lang, out_wav: &Path) -> Result<()> {
    let text = text.replace('\n', " ");
    if command_exists("say") {
        let aiff_path = out_wav.with_extension("aiff");
        let status = Command::new("say")
            .arg("-o")
            .arg(&aiff_path)
            .arg(&text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| "failed to run say")?;
        if !status.success() {
            return Err(anyhow!("say failed to synthesize audio"));
        }
        run_ffmpeg(&[
            "-y",
            "-i",
            aiff_path.to_string_lossy().as_ref(),
            out_wav.to_string_lossy().as_ref(),
        ])
        .with_context(|| "failed to convert say output")?;
        return Ok(());
    }

    if command_exists("espeak") {
        let status = Command::new("espeak")
            .arg("-v")
            .arg(language.espeak_voice())
            .arg("-w")
            .arg(out_wav)
            .arg(&text)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| "failed to run espeak")?;
        if !status.success() {
            return Err(anyhow!("espeak failed to synthesize audio"));
        }
        return Ok(());
    }

    Err(anyhow!(
        "no TTS engine found (install macOS 'say' or Linux 'espeak')"
    ))
}

pub(crate) fn command_exists(cmd: &str) -> bool {
    let path = Path::new(cmd);
    if path.components().count() > 1 {
        return is_executable(path);
    }

    let path_var = match env::var_os("PATH") {
        Some(value) => value,
        None => return false,
    };

    for dir in env::split_paths(&path_var) {
        if is_executable(&dir.join(cmd)) {
            return true;
        }
    }
    false
}

fn is_executable(path: &Path) -> bool {
    let metadata = match fs::metadata(path) {
        Ok(value) => value,
        Err(_) => return false,
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

pub(crate) fn ensure_command(cmd: &str, message: &str) -> Result<()> {
    if command_exists(cmd) {
        Ok(())
    } else {
        Err(anyhow!("{}", message))
    }
}

fn run_ffmpeg(args: &[&str]) -> Result<()> {
    let output = Command::new("ffmpeg")
        .args(args)
        .output()
        .with_context(|| "failed to run ffmpeg")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffmpeg failed: {}", stderr.trim()));
    }
    Ok(())
}

async fn whisper_model_path(override_model: Option<&str>) -> Result<PathBuf> {
    if let Some(value) = override_model {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            let path = PathBuf::from(trimmed);
            if path.exists() {
                return Ok(path);
            }
            if let Some(model) = normalize_model_name(trimmed) {
                return ensure_whisper_model(&model).await;
            }
            return Err(anyhow!("unknown whisper model: {}", trimmed));
        }
    }
    ensure_whisper_model("base").await
}

async fn ensure_whisper_model(model: &str) -> Result<PathBuf> {
    let normalized = normalize_model_name(model).unwrap_or_else(|| "base".to_string());
    let dest = default_model_path(&normalized)?;
    if dest.exists() {
        return Ok(dest);
    }

    let url = format!("{}/ggml-{}.bin", WHISPER_MODEL_BASE_URL, normalized);
    info!("whisper model not found; downloading {} ...", normalized);
    download_whisper_model(&url, &dest).await?;
    Ok(dest)
}

fn default_model_path(model: &str) -> Result<PathBuf> {
    let file = format!("ggml-{}.bin", model);
    if let Ok(home) = std::env::var("HOME") {
        let home = home.trim();
        if !home.is_empty() {
            return Ok(Path::new(home).join(".transly/.cache/whisper").join(file));
        }
    }
    Ok(Path::new(".transly/.cache/whisper").join(file))
}

fn normalize_model_name(input: &str) -> Option<String> {
    let raw = input.trim().to_lowercase();
    if raw.is_empty() {
        return None;
    }
    let trimmed = raw.strip_prefix("ggml-").unwrap_or(&raw);
    let trimmed = trimmed.strip_suffix(".bin").unwrap_or(trimmed);

    let allowed = [
        "tiny",
        "base",
        "small",
        "medium",
        "large",
        "large-v2",
        "large-v3",
        "tiny.en",
        "base.en",
        "small.en",
        "medium.en",
    ];
    if allowed.contains(&trimmed) {
        return Some(trimmed.to_string());
    }
    None
}

async fn download_whisper_model(url: &str, dest: &Path) -> Result<()> {
    let dir = dest.parent().ok_or_else(|| anyhow!("invalid model path"))?;
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create model dir: {}", dir.display()))?;

    let response = reqwest::get(url)
        .await
        .with_context(|| format!("failed to download whisper model: {}", url))?;
    if !response.status().is_success() {
        return Err(anyhow!(
            "failed to download whisper model: {} (status {})",
            url,
            response.status()
        ));
    }

    let tmp = dest.with_extension("bin.part");
    let mut file = fs::File::create(&tmp)
        .with_context(|| format!("failed to write model: {}", tmp.display()))?;
    let mut stream = response.bytes_stream();
    use futures_util::StreamExt;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| "failed to read model bytes")?;
        std::io::Write::write_all(&mut file, &chunk)?;
    }
    fs::rename(&tmp, dest)
        .with_context(|| format!("failed to finalize model: {}", dest.display()))?;
    Ok(())
}

fn read_wav_mono_f32(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open wav: {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(anyhow!("wav has no channels"));
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().map(|s| s.unwrap_or(0.0)).collect(),
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            let max = (1i64 << (bits - 1)) as f32;
            if bits <= 16 {
                reader
                    .samples::<i16>()
                    .map(|s| s.unwrap_or(0) as f32 / max)
                    .collect()
            } else {
                reader
                    .samples::<i32>()
                    .map(|s| s.unwrap_or(0) as f32 / max)
                    .collect()
            }
        }
    };

    if channels == 1 {
        return Ok(samples);
    }

    let mut mono = Vec::with_capacity(samples.len() / channels);
    for chunk in samples.chunks(channels) {
        let sum: f32 = chunk.iter().sum();
        mono.push(sum / channels as f32);
    }
    Ok(mono)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_names_normalize() {
        assert_eq!(normalize_model_name("base").as_deref(), Some("base"));
        assert_eq!(
            normalize_model_name("ggml-medium.bin").as_deref(),
            Some("medium")
        );
        assert_eq!(
            normalize_model_name("LARGE-V3").as_deref(),
            Some("large-v3")
        );
        assert!(normalize_model_name("enormous").is_none());
        assert!(normalize_model_name("").is_none());
    }

    #[test]
    fn reads_stereo_wav_as_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..8 {
            writer.write_sample(16384i16).unwrap();
            writer.write_sample(-16384i16).unwrap();
        }
        writer.finalize().unwrap();

        let samples = read_wav_mono_f32(&path).unwrap();
        assert_eq!(samples.len(), 8);
        assert!(samples.iter().all(|value| value.abs() < 1e-3));
    }

    #[test]
    fn wav_uploads_convert_to_a_distinct_file() {
        let dir = Path::new("/tmp/audio");
        let (input, output) = conversion_paths(dir, "wav");
        assert_ne!(input, output);
        assert_eq!(input, dir.join("input.wav"));
        assert_eq!(output, dir.join("converted.wav"));

        let (input, output) = conversion_paths(dir, "mp3");
        assert_ne!(input, output);
        assert_eq!(input, dir.join("input.mp3"));
    }

    #[test]
    fn missing_commands_are_reported() {
        assert!(!command_exists("definitely-not-a-real-binary-9000"));
        assert!(ensure_command("definitely-not-a-real-binary-9000", "nope").is_err());
    }
}
