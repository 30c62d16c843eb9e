//! Pure encoding: Command → IrMagician wire string.
//!
//! No I/O, no side effects. The whole wire format is the tag followed by
//! comma-joined decimal arguments and CRLF; no escaping, no checksum.

use crate::domain::IrmResult;

use super::{validate_args, Command};

/// Encode a tag and arguments as `"{tag}[,{arg}]*\r\n"`.
pub fn encode(tag: char, args: &[i64]) -> String {
    let mut wire = String::with_capacity(2 + args.len() * 6);
    wire.push(tag);
    for arg in args {
        wire.push(',');
        wire.push_str(&arg.to_string());
    }
    wire.push_str("\r\n");
    wire
}

/// Validate a command's arguments, then encode it.
///
/// Nothing is produced for an out-of-range argument, so a rejected value
/// can never reach the wire.
pub fn encode_command(cmd: &Command) -> IrmResult<String> {
    let spec = cmd.spec();
    let args = cmd.args();
    validate_args(spec, &args)?;
    Ok(encode(spec.tag, &args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IrmError;
    use Command::*;

    #[test]
    fn encode_single_argument() {
        assert_eq!(encode('b', &[5]), "b,5\r\n");
    }

    #[test]
    fn encode_two_arguments() {
        assert_eq!(encode('w', &[10, 200]), "w,10,200\r\n");
    }

    #[test]
    fn encode_no_arguments() {
        assert_eq!(encode('c', &[]), "c\r\n");
    }

    #[test]
    fn encode_set_bank() {
        assert_eq!(encode_command(&SetBank(9)).unwrap(), "b,9\r\n");
    }

    #[test]
    fn encode_led_on_off() {
        assert_eq!(encode_command(&LedOn).unwrap(), "l,1\r\n");
        assert_eq!(encode_command(&LedOff).unwrap(), "l,0\r\n");
    }

    #[test]
    fn encode_record_pointer_max() {
        assert_eq!(encode_command(&RecordPointer(65535)).unwrap(), "n,65535\r\n");
    }

    #[test]
    fn encode_queries() {
        assert_eq!(encode_command(&Temperature).unwrap(), "t\r\n");
        assert_eq!(encode_command(&Version).unwrap(), "v\r\n");
        assert_eq!(encode_command(&Statics).unwrap(), "s\r\n");
        assert_eq!(encode_command(&Play).unwrap(), "p\r\n");
        assert_eq!(encode_command(&ErrorCheck).unwrap(), "e\r\n");
    }

    #[test]
    fn encode_write_memory() {
        assert_eq!(
            encode_command(&Write { pos: 63, data: 255 }).unwrap(),
            "w,63,255\r\n"
        );
    }

    #[test]
    fn out_of_range_is_rejected_not_encoded() {
        let err = encode_command(&PosScaler(0)).unwrap_err();
        assert!(matches!(err, IrmError::OutOfRange(ref e) if e.name == "pos_scaler"));
        assert!(encode_command(&Dump(64)).is_err());
        assert!(encode_command(&Write { pos: -1, data: 0 }).is_err());
    }
}
