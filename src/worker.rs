use std::io::{ErrorKind, Read, Write};

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ConcatError;
use crate::pool::{HandlePool, Token};
use crate::storage::Storage;

/// An open handle together with the token that allows it to be open.
///
/// Fields drop in declaration order, the handle is closed before its token
/// goes back to the pool.
struct Held<'p, H> {
    handle: H,
    _token: Token<'p>,
}

/// Writes the contents of `inputs`, in order, into a freshly created
/// `output`. Returns the number of bytes written.
///
/// The output holds one token for the whole call and each input holds a
/// second one while it is being streamed, so a single call never has more
/// than two tokens. Inputs are read in chunks of `chunk_size` bytes until
/// end-of-input, short reads are fine. All tokens are back in the pool when
/// this returns, whether it succeeded or not.
pub fn concat<S: Storage>(
    storage: &S,
    pool: &HandlePool,
    inputs: &[Utf8PathBuf],
    output: &Utf8Path,
    chunk_size: usize,
) -> Result<u64, ConcatError> {
    let mut sink = {
        let token = pool.acquire();
        let handle = storage
            .create(output)
            .map_err(|e| ConcatError::Create(output.to_owned(), e))?;

        Held {
            handle,
            _token: token,
        }
    };

    let mut buffer = vec![0u8; chunk_size];
    let mut written = 0;

    for path in inputs {
        let token = pool.acquire();
        let handle = storage
            .open(path)
            .map_err(|e| ConcatError::Open(path.clone(), e))?;

        let mut source = Held {
            handle,
            _token: token,
        };

        loop {
            let n = match source.handle.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ConcatError::Read(path.clone(), e)),
            };

            sink.handle
                .write_all(&buffer[..n])
                .map_err(|e| ConcatError::Write(output.to_owned(), e))?;

            written += n as u64;
        }

        tracing::trace!(input = %path, output = %output, "input drained");
    }

    sink.handle
        .flush()
        .map_err(|e| ConcatError::Flush(output.to_owned(), e))?;

    Ok(written)
}
