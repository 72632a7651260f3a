//! Keccak-256: the unchanged NIST draft Keccak (padding byte `0x01`, not the
//! final SHA-3 `0x06`), rate 1088 bits (136 bytes), capacity 512 bits.
//!
//! Exposes a one-shot [`hash`], a streaming [`Keccak256`] hasher that
//! tolerates absorb chunks of arbitrary length without touching the
//! caller's buffer, and a `const fn` variant ([`hash_const`]) so selectors
//! and event topics can be embedded as compile-time constants with exactly
//! the same bytes as the runtime call.

const RATE: usize = 136; // 1088 bits
const ROTC: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];
const PILN: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];
const RNDC: [u64; 24] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

#[inline]
fn rotl64(x: u64, n: u32) -> u64 {
    x.rotate_left(n)
}

fn keccakf(state: &mut [u64; 25]) {
    for round in 0..24 {
        // theta
        let mut bc = [0u64; 5];
        for i in 0..5 {
            bc[i] = state[i] ^ state[i + 5] ^ state[i + 10] ^ state[i + 15] ^ state[i + 20];
        }
        for i in 0..5 {
            let t = bc[(i + 4) % 5] ^ rotl64(bc[(i + 1) % 5], 1);
            let mut j = i;
            while j < 25 {
                state[j] ^= t;
                j += 5;
            }
        }
        // rho + pi
        let mut t = state[1];
        for i in 0..24 {
            let j = PILN[i];
            let tmp = state[j];
            state[j] = rotl64(t, ROTC[i]);
            t = tmp;
        }
        // chi
        let mut j = 0;
        while j < 25 {
            let mut bc = [0u64; 5];
            for i in 0..5 {
                bc[i] = state[j + i];
            }
            for i in 0..5 {
                state[j + i] ^= (!bc[(i + 1) % 5]) & bc[(i + 2) % 5];
            }
            j += 5;
        }
        // iota
        state[0] ^= RNDC[round];
    }
}

fn absorb_block(state: &mut [u64; 25], block: &[u8; RATE]) {
    for i in 0..(RATE / 8) {
        let mut lane = [0u8; 8];
        lane.copy_from_slice(&block[i * 8..i * 8 + 8]);
        state[i] ^= u64::from_le_bytes(lane);
    }
    keccakf(state);
}

fn squeeze(state: &[u64; 25]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..4 {
        out[i * 8..i * 8 + 8].copy_from_slice(&state[i].to_le_bytes());
    }
    out
}

/// One-shot Keccak-256.
pub fn hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize()
}

/// Streaming Keccak-256 hasher. Absorbs chunks of any length without
/// modifying the caller's input.
#[derive(Clone)]
pub struct Keccak256 {
    state: [u64; 25],
    buffer: [u8; RATE],
    buffer_len: usize,
}

impl Keccak256 {
    pub fn new() -> Self {
        Keccak256 {
            state: [0u64; 25],
            buffer: [0u8; RATE],
            buffer_len: 0,
        }
    }

    pub fn update(&mut self, mut data: &[u8]) {
        if self.buffer_len > 0 {
            let take = core::cmp::min(RATE - self.buffer_len, data.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&data[..take]);
            self.buffer_len += take;
            data = &data[take..];
            if self.buffer_len == RATE {
                let block = self.buffer;
                absorb_block(&mut self.state, &block);
                self.buffer_len = 0;
            }
        }
        while data.len() >= RATE {
            let mut block = [0u8; RATE];
            block.copy_from_slice(&data[..RATE]);
            absorb_block(&mut self.state, &block);
            data = &data[RATE..];
        }
        if !data.is_empty() {
            self.buffer[..data.len()].copy_from_slice(data);
            self.buffer_len = data.len();
        }
    }

    pub fn finalize(mut self) -> [u8; 32] {
        let mut block = [0u8; RATE];
        block[..self.buffer_len].copy_from_slice(&self.buffer[..self.buffer_len]);
        block[self.buffer_len] = 0x01;
        block[RATE - 1] |= 0x80;
        absorb_block(&mut self.state, &block);
        squeeze(&self.state)
    }
}

impl Default for Keccak256 {
    fn default() -> Self {
        Self::new()
    }
}

/// The 4-byte function selector: the first 4 bytes of `hash(signature)`.
/// `signature` must already be the canonical, space-free text
/// (`"transfer(address,uint256)"`, not `"transfer(address, uint256)"`).
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = hash(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

// ---------------------------------------------------------------------------
// const fn variant
// ---------------------------------------------------------------------------

const fn rotl64_const(x: u64, n: u32) -> u64 {
    (x << n) | (x >> (64 - n))
}

const fn keccakf_const(state: &mut [u64; 25]) {
    let mut round = 0;
    while round < 24 {
        let mut bc = [0u64; 5];
        let mut i = 0;
        while i < 5 {
            bc[i] = state[i] ^ state[i + 5] ^ state[i + 10] ^ state[i + 15] ^ state[i + 20];
            i += 1;
        }
        i = 0;
        while i < 5 {
            let t = bc[(i + 4) % 5] ^ rotl64_const(bc[(i + 1) % 5], 1);
            let mut j = i;
            while j < 25 {
                state[j] ^= t;
                j += 5;
            }
            i += 1;
        }
        let mut t = state[1];
        i = 0;
        while i < 24 {
            let j = PILN[i];
            let tmp = state[j];
            state[j] = rotl64_const(t, ROTC[i]);
            t = tmp;
            i += 1;
        }
        let mut j = 0;
        while j < 25 {
            let mut bc2 = [0u64; 5];
            let mut k = 0;
            while k < 5 {
                bc2[k] = state[j + k];
                k += 1;
            }
            k = 0;
            while k < 5 {
                state[j + k] ^= (!bc2[(k + 1) % 5]) & bc2[(k + 2) % 5];
                k += 1;
            }
            j += 5;
        }
        state[0] ^= RNDC[round];
        round += 1;
    }
}

const fn absorb_block_const(state: &mut [u64; 25], block: &[u8; RATE]) {
    let mut i = 0;
    while i < RATE / 8 {
        let mut lane = 0u64;
        let mut k = 0;
        while k < 8 {
            lane |= (block[i * 8 + k] as u64) << (8 * k);
            k += 1;
        }
        state[i] ^= lane;
        i += 1;
    }
    keccakf_const(state);
}

/// Compile-time-evaluable Keccak-256, used to embed selector/topic
/// constants. Byte-identical to [`hash`] for the same input.
pub const fn hash_const(data: &[u8]) -> [u8; 32] {
    let mut state = [0u64; 25];
    let mut remaining = data;
    while remaining.len() >= RATE {
        let mut block = [0u8; RATE];
        let mut i = 0;
        while i < RATE {
            block[i] = remaining[i];
            i += 1;
        }
        absorb_block_const(&mut state, &block);
        remaining = remaining.split_at(RATE).1;
    }
    let mut block = [0u8; RATE];
    let mut i = 0;
    while i < remaining.len() {
        block[i] = remaining[i];
        i += 1;
    }
    block[remaining.len()] = 0x01;
    block[RATE - 1] |= 0x80;
    absorb_block_const(&mut state, &block);

    let mut out = [0u8; 32];
    let mut i = 0;
    while i < 4 {
        let bytes = state[i].to_le_bytes();
        let mut k = 0;
        while k < 8 {
            out[i * 8 + k] = bytes[k];
            k += 1;
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let h = hash(b"");
        assert_eq!(
            crate::hex::encode(&h),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn streaming_matches_one_shot() {
        let data = b"hello world, this message is longer than one 136-byte block so it spans absorbs";
        let mut hasher = Keccak256::new();
        for chunk in data.chunks(7) {
            hasher.update(chunk);
        }
        assert_eq!(hasher.finalize(), hash(data));
    }

    #[test]
    fn const_matches_runtime() {
        const DIGEST: [u8; 32] = hash_const(b"hello");
        assert_eq!(DIGEST, hash(b"hello"));
    }

    #[test]
    fn transfer_selector() {
        assert_eq!(
            crate::hex::encode(&selector("transfer(address,uint256)")),
            "a9059cbb"
        );
        assert_eq!(
            crate::hex::encode(&selector("balanceOf(address)")),
            "70a08231"
        );
    }

    #[test]
    fn transfer_event_topic0() {
        let topic = hash(b"Transfer(address,address,uint256)");
        assert_eq!(
            crate::hex::encode(&topic),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
