use std::io::{self, Read, Write};

/// Largest message the two-byte length prefix can describe.
pub const MAX_MESSAGE_SIZE: usize = u16::MAX as usize;

/// Reads one message: a big-endian `u16` byte count followed by that many
/// bytes of UTF-8 text.
pub fn read_prefixed<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut len_bytes = [0; 2];
    reader.read_exact(&mut len_bytes)?;
    let len = usize::from(u16::from_be_bytes(len_bytes));

    // Read the remaining data. If we get a would block error after the
    // prefix arrived, then it's very likely that the sender doesn't follow
    // the prefix protocol, so report invalid data rather than a timeout.
    let mut buf = vec![0; len];
    if let Err(error) = reader.read_exact(&mut buf) {
        let kind = match error.kind() {
            io::ErrorKind::WouldBlock => io::ErrorKind::InvalidData,
            error => error,
        };
        return Err(kind.into());
    }

    String::from_utf8(buf).map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
}

pub fn write_prefixed<W: Write>(writer: &mut W, message: &str) -> io::Result<()> {
    let bytes = message.as_bytes();
    if bytes.len() > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "message size {} exceeds maximum allowed size of {MAX_MESSAGE_SIZE} bytes",
                bytes.len()
            ),
        ));
    }

    // Write the size and the message all in one chunk to prevent
    // read-side EOF race conditions.
    let size = bytes.len() as u16;
    let mut buf = Vec::with_capacity(2 + bytes.len());
    buf.extend(size.to_be_bytes());
    buf.extend(bytes);
    writer.write_all(&buf)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Cursor, Write},
        net::{TcpListener, TcpStream},
    };

    use super::{MAX_MESSAGE_SIZE, read_prefixed, write_prefixed};

    fn setup() -> (TcpStream, TcpStream) {
        let server = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (stream, _) = server.accept().unwrap();
        (client, stream)
    }

    #[test]
    fn write_and_read() {
        let (mut client, mut stream) = setup();
        assert!(write_prefixed(&mut stream, "play:dealer:7H:you:9S:9D").is_ok());
        assert!(read_prefixed(&mut client).is_ok_and(|v| v == "play:dealer:7H:you:9S:9D"));
    }

    #[test]
    fn frame_layout() {
        let mut buf = Vec::new();
        write_prefixed(&mut buf, "login").unwrap();
        assert_eq!(buf, [0, 5, b'l', b'o', b'g', b'i', b'n']);
    }

    #[test]
    fn write_and_read_multiple_messages() {
        let (mut client, mut stream) = setup();
        let msgs = ["login", "bet:500", "status:win:dealer:19:you:20"];
        for msg in msgs {
            assert!(write_prefixed(&mut stream, msg).is_ok());
        }
        for msg in msgs {
            assert_eq!(read_prefixed(&mut client).unwrap(), msg);
        }
    }

    #[test]
    fn write_and_read_empty_message() {
        let mut buf = Cursor::new(Vec::new());
        write_prefixed(&mut buf, "").unwrap();
        buf.set_position(0);
        assert_eq!(read_prefixed(&mut buf).unwrap(), "");
    }

    #[test]
    fn write_and_read_largest_message() {
        let (mut client, mut stream) = setup();
        let large = "x".repeat(MAX_MESSAGE_SIZE);
        let writer = std::thread::spawn(move || write_prefixed(&mut stream, &large));
        assert_eq!(read_prefixed(&mut client).unwrap().len(), MAX_MESSAGE_SIZE);
        assert!(writer.join().unwrap().is_ok());
    }

    #[test]
    fn reject_oversized_message() {
        let mut buf = Vec::new();
        let too_large = "x".repeat(MAX_MESSAGE_SIZE + 1);
        assert_eq!(
            write_prefixed(&mut buf, &too_large).map_err(|e| e.kind()),
            Err(io::ErrorKind::InvalidData)
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn read_truncated_message() {
        let (mut client, mut stream) = setup();
        assert!(stream.write_all(&10u16.to_be_bytes()).is_ok());
        assert!(stream.write_all(b"bet").is_ok());
        drop(stream);
        assert_eq!(
            read_prefixed(&mut client).map_err(|e| e.kind()),
            Err(io::ErrorKind::UnexpectedEof)
        );
    }

    #[test]
    fn read_partial_length() {
        let (mut client, mut stream) = setup();
        assert!(stream.write_all(&[0]).is_ok());
        drop(stream);
        assert_eq!(
            read_prefixed(&mut client).map_err(|e| e.kind()),
            Err(io::ErrorKind::UnexpectedEof)
        );
    }

    #[test]
    fn read_invalid_utf8() {
        let mut buf = Cursor::new(vec![0, 2, 0xff, 0xfe]);
        assert_eq!(
            read_prefixed(&mut buf).map_err(|e| e.kind()),
            Err(io::ErrorKind::InvalidData)
        );
    }

    #[test]
    fn stress_test_many_sequential_messages() {
        let (mut client, mut stream) = setup();
        for i in 0..500 {
            let msg = format!("bet:{i}");
            assert!(write_prefixed(&mut stream, &msg).is_ok());
            assert_eq!(read_prefixed(&mut client).unwrap(), msg);
        }
    }
}
