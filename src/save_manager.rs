use crate::core::game_state::GameState;
use directories::ProjectDirs;
use log::info;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Manages saving and loading game state as JSON on disk
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Creates a new SaveManager instance
    ///
    /// Sets up the save directory at the appropriate location for the platform
    /// using the `directories` crate.
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "dorp").ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not determine config directory")
        })?;

        let config_dir = project_dirs.config_dir();
        fs::create_dir_all(config_dir)?;

        let save_path = config_dir.join("save.json");

        Ok(Self { save_path })
    }

    /// Creates a SaveManager that reads and writes a specific file. Used by
    /// tests to keep saves out of the real config directory.
    pub fn with_path(save_path: PathBuf) -> Self {
        Self { save_path }
    }

    /// Saves the game state to disk as pretty-printed JSON
    pub fn save(&self, state: &GameState) -> io::Result<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        if let Some(parent) = self.save_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.save_path, json)?;
        info!("game saved to {}", self.save_path.display());
        Ok(())
    }

    /// Loads the game state from disk
    ///
    /// Missing fields fall back to their defaults, so saves written by
    /// older builds load cleanly. Returns an error if the file doesn't
    /// exist or the JSON is malformed.
    pub fn load(&self) -> io::Result<GameState> {
        let json = fs::read_to_string(&self.save_path)?;
        let mut state: GameState = serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        state.normalize();
        Ok(state)
    }

    /// Checks if a save file exists
    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Deletes the save file if it exists
    pub fn delete_save(&self) -> io::Result<()> {
        if self.save_path.exists() {
            fs::remove_file(&self.save_path)?;
        }
        Ok(())
    }
}
