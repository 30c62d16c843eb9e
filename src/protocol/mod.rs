//! IrMagician command protocol.
//!
//! Every command is one ASCII line, `TAG[,ARG]*\r\n`. The firmware replies
//! with zero to three CRLF lines depending on the command, except `dump`,
//! which answers with two bare bytes.
//!
//! This module separates the concerns of the exchange:
//! - `validate`: check arguments against each command's legal range (pure)
//! - `encode`: translate Command → wire string (pure)
//! - `decode`: pick the payload out of what was read, by response shape (pure)
//! - `session`: own the serial connection and drive the reads and writes
//!
//! Tags, argument ranges and response shapes live in one table,
//! [`COMMAND_TABLE`], so the other pieces are parameterized by data rather
//! than duplicated per command.

pub mod decode;
pub mod encode;
pub mod session;
pub mod validate;

pub use decode::{decode, RawReply};
pub use encode::{encode, encode_command};
pub use session::ProtocolSession;
pub use validate::{validate, validate_args};

/// How the firmware answers a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Write only, nothing is read.
    None,
    /// One line, returned verbatim.
    Line,
    /// Two lines; the first is the payload, the second is trailing noise.
    FirstOfTwo,
    /// Three lines: echo of the command, an `OK` marker, then the payload.
    ThirdOfThree,
    /// A fixed number of raw bytes with no line terminator.
    Bytes(usize),
}

impl ResponseShape {
    /// Number of CRLF lines this shape consumes.
    pub fn line_count(self) -> usize {
        match self {
            ResponseShape::None | ResponseShape::Bytes(_) => 0,
            ResponseShape::Line => 1,
            ResponseShape::FirstOfTwo => 2,
            ResponseShape::ThirdOfThree => 3,
        }
    }
}

/// One integer argument with its closed-open legal range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub min: i64,
    pub max: i64,
}

const fn param(name: &'static str, min: i64, max: i64) -> Param {
    Param { name, min, max }
}

/// Wire-level description of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub tag: char,
    pub params: &'static [Param],
    pub shape: ResponseShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Bank,
    Capture,
    Dump,
    ErrorCheck,
    Information,
    PosScaler,
    Led,
    Modulation,
    RecordPointer,
    Play,
    Reset,
    Statics,
    Temperature,
    Version,
    Write,
}

/// Single source of truth for tag, argument ranges and reply shape.
pub const COMMAND_TABLE: &[CommandSpec] = &[
    CommandSpec { kind: CommandKind::Bank, tag: 'b', params: &[param("bank", 0, 10)], shape: ResponseShape::None },
    CommandSpec { kind: CommandKind::Capture, tag: 'c', params: &[], shape: ResponseShape::None },
    CommandSpec { kind: CommandKind::Dump, tag: 'd', params: &[param("position", 0, 64)], shape: ResponseShape::Bytes(2) },
    CommandSpec { kind: CommandKind::ErrorCheck, tag: 'e', params: &[], shape: ResponseShape::Line },
    CommandSpec { kind: CommandKind::Information, tag: 'i', params: &[param("info", 0, 8)], shape: ResponseShape::Line },
    CommandSpec { kind: CommandKind::PosScaler, tag: 'k', params: &[param("pos_scaler", 1, 256)], shape: ResponseShape::Line },
    CommandSpec { kind: CommandKind::Led, tag: 'l', params: &[param("led", 0, 2)], shape: ResponseShape::Line },
    CommandSpec { kind: CommandKind::Modulation, tag: 'm', params: &[param("modulation", 0, 3)], shape: ResponseShape::Line },
    CommandSpec { kind: CommandKind::RecordPointer, tag: 'n', params: &[param("record_pointer", 0, 65536)], shape: ResponseShape::Line },
    CommandSpec { kind: CommandKind::Play, tag: 'p', params: &[], shape: ResponseShape::None },
    CommandSpec { kind: CommandKind::Reset, tag: 'r', params: &[param("reset", 0, 2)], shape: ResponseShape::Line },
    CommandSpec { kind: CommandKind::Statics, tag: 's', params: &[], shape: ResponseShape::Line },
    CommandSpec { kind: CommandKind::Temperature, tag: 't', params: &[], shape: ResponseShape::FirstOfTwo },
    CommandSpec { kind: CommandKind::Version, tag: 'v', params: &[], shape: ResponseShape::ThirdOfThree },
    CommandSpec { kind: CommandKind::Write, tag: 'w', params: &[param("position", 0, 64), param("data", 0, 256)], shape: ResponseShape::None },
];

impl CommandKind {
    pub fn spec(self) -> &'static CommandSpec {
        // Table order matches declaration order; checked in tests.
        &COMMAND_TABLE[self as usize]
    }
}

/// High-level commands understood by the IrMagician firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Memory bank, 0–9
    SetBank(i64),
    Capture,
    /// Byte position within the selected bank, 0–63
    Dump(i64),
    ErrorCheck,
    /// Information slot, 0–7
    Information(i64),
    /// 1–255
    PosScaler(i64),
    LedOn,
    LedOff,
    /// 0–2
    Modulation(i64),
    /// 0–65535
    RecordPointer(i64),
    Play,
    /// 0–1
    Reset(i64),
    Statics,
    Temperature,
    Version,
    /// Store `data` (0–255) at `pos` (0–63) in the selected bank
    Write { pos: i64, data: i64 },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        use Command::*;
        match self {
            SetBank(_) => CommandKind::Bank,
            Capture => CommandKind::Capture,
            Dump(_) => CommandKind::Dump,
            ErrorCheck => CommandKind::ErrorCheck,
            Information(_) => CommandKind::Information,
            PosScaler(_) => CommandKind::PosScaler,
            LedOn | LedOff => CommandKind::Led,
            Modulation(_) => CommandKind::Modulation,
            RecordPointer(_) => CommandKind::RecordPointer,
            Play => CommandKind::Play,
            Reset(_) => CommandKind::Reset,
            Statics => CommandKind::Statics,
            Temperature => CommandKind::Temperature,
            Version => CommandKind::Version,
            Write { .. } => CommandKind::Write,
        }
    }

    pub fn spec(&self) -> &'static CommandSpec {
        self.kind().spec()
    }

    /// Argument values in wire order.
    pub fn args(&self) -> Vec<i64> {
        use Command::*;
        match *self {
            SetBank(n) | Dump(n) | Information(n) | PosScaler(n) | Modulation(n)
            | RecordPointer(n) | Reset(n) => vec![n],
            LedOn => vec![1],
            LedOff => vec![0],
            Write { pos, data } => vec![pos, data],
            Capture | ErrorCheck | Play | Statics | Temperature | Version => Vec::new(),
        }
    }
}
