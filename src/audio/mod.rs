use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// The selectable adhan recordings plus the settings-screen test tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzanSound {
    Makkah,
    Madinah,
    Egypt,
    Turkey,
    Test,
}

impl AzanSound {
    /// Maps the persisted setting value to a sound; unknown names fall back
    /// to Makkah, the default recording.
    pub fn from_name(name: &str) -> AzanSound {
        match name {
            "madinah" => AzanSound::Madinah,
            "egypt" => AzanSound::Egypt,
            "turkey" => AzanSound::Turkey,
            "test" => AzanSound::Test,
            _ => AzanSound::Makkah,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SoundFiles {
    pub makkah: PathBuf,
    pub madinah: PathBuf,
    pub egypt: PathBuf,
    pub turkey: PathBuf,
    pub test_tone: PathBuf,
}

#[derive(Clone)]
pub struct AudioManager {
    volume: Arc<Mutex<f32>>,
    sound_files: Arc<Mutex<SoundFiles>>,
}

impl AudioManager {
    pub fn new() -> Result<Self> {
        info!("Initializing audio system");

        let volume = Arc::new(Mutex::new(0.7)); // Default volume 70%
        let sound_files = Arc::new(Mutex::new(Self::default_sound_files()));

        Ok(AudioManager {
            volume,
            sound_files,
        })
    }

    /// Create a dummy audio manager that does nothing.
    /// Used when audio system initialization fails.
    pub fn new_dummy() -> Self {
        warn!("Using dummy audio manager - audio features will be disabled");

        AudioManager {
            volume: Arc::new(Mutex::new(0.0)), // Silent by default
            sound_files: Arc::new(Mutex::new(SoundFiles {
                makkah: PathBuf::new(),
                madinah: PathBuf::new(),
                egypt: PathBuf::new(),
                turkey: PathBuf::new(),
                test_tone: PathBuf::new(),
            })),
        }
    }

    fn default_sound_files() -> SoundFiles {
        let sounds_dir = Self::sounds_dir();
        // ./sounds in the working tree takes precedence during development.
        let dev_sounds = PathBuf::from("sounds");

        let resolve = |name: &str| {
            if dev_sounds.join(name).exists() {
                dev_sounds.join(name)
            } else {
                sounds_dir.join(name)
            }
        };

        SoundFiles {
            makkah: resolve("azan_makkah.mp3"),
            madinah: resolve("azan_madinah.mp3"),
            egypt: resolve("azan_egypt.mp3"),
            turkey: resolve("azan_turkey.mp3"),
            test_tone: resolve("test_tone.wav"),
        }
    }

    fn sounds_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("openadhan")
            .join("sounds")
    }

    pub fn set_volume(&self, volume: f32) -> Result<()> {
        let vol = volume.clamp(0.0, 1.0);
        *self.volume.lock().unwrap() = vol;
        info!("Set audio volume to {:.0}%", vol * 100.0);
        Ok(())
    }

    pub fn get_volume(&self) -> f32 {
        *self.volume.lock().unwrap()
    }

    pub fn update_sound_files(&self, sound_files: SoundFiles) -> Result<()> {
        *self.sound_files.lock().unwrap() = sound_files;
        info!("Updated sound file paths");
        Ok(())
    }

    /// Plays the given adhan on a blocking worker. Returns as soon as
    /// playback is scheduled; a missing file degrades to a generated tone.
    pub fn play_azan(&self, sound: AzanSound) -> Result<()> {
        let sound_files = self.sound_files.lock().unwrap();
        let sound_path = match sound {
            AzanSound::Makkah => &sound_files.makkah,
            AzanSound::Madinah => &sound_files.madinah,
            AzanSound::Egypt => &sound_files.egypt,
            AzanSound::Turkey => &sound_files.turkey,
            AzanSound::Test => &sound_files.test_tone,
        };

        let volume = *self.volume.lock().unwrap();
        let sound_path = sound_path.clone();

        tokio::task::spawn_blocking(move || {
            if let Err(e) = Self::play_sound_file(&sound_path, volume) {
                error!("Failed to play sound {:?}: {}", sound_path, e);
            }
        });

        Ok(())
    }

    fn play_sound_file(sound_path: &Path, volume: f32) -> Result<()> {
        // Create output stream on each call (OutputStream is not Send + Sync)
        let (stream, stream_handle) =
            OutputStream::try_default().context("Failed to create audio output stream")?;

        if !sound_path.exists() {
            warn!("Sound file does not exist: {:?}", sound_path);
            return Self::play_default_tone(&stream_handle, volume);
        }

        debug!("Playing sound file: {:?}", sound_path);

        let file = File::open(sound_path).context("Failed to open sound file")?;
        let reader = BufReader::new(file);

        let source = Decoder::new(reader)?
            .convert_samples::<f32>()
            .amplify(volume);

        let sink = Sink::try_new(&stream_handle)?;
        sink.append(source);

        // Wait for the sound to finish playing
        sink.sleep_until_end();

        // Keep stream alive until sound finishes
        drop(stream);

        Ok(())
    }

    fn play_default_tone(stream_handle: &OutputStreamHandle, volume: f32) -> Result<()> {
        warn!("Playing default sine wave tone (no sound file found)");

        let source = rodio::source::SineWave::new(440.0)
            .take_duration(Duration::from_millis(500))
            .amplify(volume * 0.3); // Lower volume for sine wave

        let sink = Sink::try_new(stream_handle)?;
        sink.append(source);

        sink.sleep_until_end();

        Ok(())
    }

    pub fn test_audio(&self) -> Result<()> {
        info!("Testing audio system");
        self.play_azan(AzanSound::Test)
    }

    pub fn ensure_sound_directory() -> Result<PathBuf> {
        let sounds_dir = Self::sounds_dir();

        if !sounds_dir.exists() {
            std::fs::create_dir_all(&sounds_dir).context("Failed to create sounds directory")?;
            info!("Created sounds directory: {:?}", sounds_dir);
        }

        Ok(sounds_dir)
    }
}
