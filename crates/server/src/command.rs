use std::collections::HashMap;

pub const SUSPEND_URI: &str = "/suspend";
pub const PLAYLIST_URI: &str = "/channels.m3u";

/// Built-in actions reachable through reserved uris.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Put the host machine to sleep.
    Suspend,
    /// Serve the filtered remote playlist.
    Playlist,
}

/// Immutable map from exact request uri to [`Command`].
///
/// Lookups compare the raw decoded uri, query included, so `/suspend?now` is not a
/// command and falls through to file serving.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: HashMap<&'static str, Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        let commands = HashMap::from([(SUSPEND_URI, Command::Suspend), (PLAYLIST_URI, Command::Playlist)]);
        Self { commands }
    }

    #[inline]
    pub fn get(&self, uri: &str) -> Option<Command> {
        self.commands.get(uri).copied()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        let table = CommandTable::new();

        assert_eq!(table.get("/suspend"), Some(Command::Suspend));
        assert_eq!(table.get("/channels.m3u"), Some(Command::Playlist));
        assert_eq!(table.len(), 2);

        assert_eq!(table.get("/suspend/"), None);
        assert_eq!(table.get("/suspend?now"), None);
        assert_eq!(table.get("/SUSPEND"), None);
        assert_eq!(table.get("/channels.m3u8"), None);
    }
}
