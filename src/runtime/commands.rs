//! The line-oriented command shell read from stdin.
//!
//! Numbers typed by the user are 1-based; they are converted to 0-based
//! indices here so the rest of the program never sees the difference.

use std::io::BufRead;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

use log::warn;

use crate::control::ControlCmd;

pub const HELP: &str = "\
songs                 list all songs
albums                list albums
album <a>             list the songs of album <a>
play <n>              play song <n>, queueing the song list around it
playalbum <a> [<t>]   play album <a> from track <t>
add <n>               append song <n> to the queue
addalbum <a>          append album <a> to the queue
queue                 show the queue
jump <i>              play queue entry <i>
rm <i>                remove queue entry <i>
clear                 empty the queue
next | prev           skip forward / back
toggle | pause | resume
seek <secs>           jump to a position in the current track
ff <secs> | rew <secs>
vol <0-100>           set the volume
status                show what is playing
help                  this text
quit";

/// Parse one shell line. `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<ControlCmd>, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let cmd = match (word.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("songs" | "ls", []) => ControlCmd::ListSongs,
        ("albums", []) => ControlCmd::ListAlbums,
        ("album", [a]) => ControlCmd::ShowAlbum(ordinal(a)?),
        ("play" | "p", [n]) => ControlCmd::PlaySong(ordinal(n)?),
        ("playalbum" | "pa", [a]) => ControlCmd::PlayAlbum {
            album: ordinal(a)?,
            track: 0,
        },
        ("playalbum" | "pa", [a, t]) => ControlCmd::PlayAlbum {
            album: ordinal(a)?,
            track: ordinal(t)?,
        },
        ("add" | "a", [n]) => ControlCmd::Enqueue(ordinal(n)?),
        ("addalbum", [a]) => ControlCmd::EnqueueAlbum(ordinal(a)?),
        ("queue" | "q", []) => ControlCmd::ShowQueue,
        ("jump" | "j", [i]) => ControlCmd::Jump(ordinal(i)?),
        ("rm" | "remove", [i]) => ControlCmd::Remove(ordinal(i)?),
        ("clear", []) => ControlCmd::Clear,
        ("next" | "n", []) => ControlCmd::Next,
        ("prev" | "previous", []) => ControlCmd::Prev,
        ("toggle" | "t", []) => ControlCmd::PlayPause,
        ("pause", []) => ControlCmd::Pause,
        ("resume", []) => ControlCmd::Play,
        ("seek", [s]) => ControlCmd::Seek(Duration::from_secs(seconds(s)?)),
        ("ff", [s]) => ControlCmd::SeekBy(seconds(s)? as i64),
        ("rew", [s]) => ControlCmd::SeekBy(-(seconds(s)? as i64)),
        ("vol" | "volume", [v]) => ControlCmd::Volume(percent(v)?),
        ("status" | "st", []) => ControlCmd::Status,
        ("help" | "?", []) => ControlCmd::Help,
        ("quit" | "exit", []) => ControlCmd::Quit,
        (other, _) => return Err(format!("unknown command or arguments: {other} (try `help`)")),
    };
    Ok(Some(cmd))
}

fn ordinal(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("expected a number from 1, got `{arg}`")),
    }
}

fn seconds(arg: &str) -> Result<u64, String> {
    arg.parse::<u64>()
        .map_err(|_| format!("expected seconds, got `{arg}`"))
}

fn percent(arg: &str) -> Result<f32, String> {
    let v = arg
        .trim_end_matches('%')
        .parse::<f32>()
        .map_err(|_| format!("expected a volume from 0 to 100, got `{arg}`"))?;
    if !v.is_finite() {
        return Err(format!("expected a volume from 0 to 100, got `{arg}`"));
    }
    Ok((v / 100.0).clamp(0.0, 1.0))
}

/// Read commands from stdin on a background thread. EOF quits.
pub fn spawn_stdin_reader(tx: Sender<ControlCmd>) {
    let spawned = thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Some(cmd)) => {
                        if tx.send(cmd).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(msg) => println!("{msg}"),
                }
            }
            let _ = tx.send(ControlCmd::Quit);
        });
    if let Err(err) = spawned {
        warn!("could not read commands from stdin: {err}");
    }
}
