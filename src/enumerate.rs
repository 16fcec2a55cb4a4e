use core::ops::ControlFlow;

/// Calls `f` with every string of exactly `length` symbols drawn from `alphabet`,
/// in lexicographic order of the alphabet. The slice handed to `f` is a working
/// buffer that is mutated right after `f` returns; copy it to keep it.
///
/// Returning `ControlFlow::Break` from `f` abandons the rest of the enumeration.
pub fn combinations<F>(alphabet: &[u8], length: usize, mut f: F) -> ControlFlow<(), ()>
where
    F: FnMut(&[u8]) -> ControlFlow<(), ()>,
{
    let mut line = Vec::with_capacity(length);
    extend(alphabet, length, &mut line, &mut f)
}

fn extend<F>(alphabet: &[u8], remaining: usize, line: &mut Vec<u8>, f: &mut F) -> ControlFlow<(), ()>
where
    F: FnMut(&[u8]) -> ControlFlow<(), ()>,
{
    if remaining == 0 {
        return f(line);
    }

    for &symbol in alphabet {
        line.push(symbol);
        let flow = extend(alphabet, remaining - 1, line, f);
        line.pop();
        if flow.is_break() {
            return flow;
        }
    }

    ControlFlow::Continue(())
}

/// Number of strings of `length` symbols over an alphabet of `alphabet_len`,
/// `None` when it does not fit in a u64.
pub fn search_space(alphabet_len: usize, length: usize) -> Option<u64> {
    let length = u32::try_from(length).ok()?;
    (alphabet_len as u64).checked_pow(length)
}
