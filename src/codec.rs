//! Fixed-width big-endian encodings. Every group element and prime takes `⌈bitlen(N)/8⌉` bytes,
//! versions and sizes take eight. Decoding checks lengths and ranges before any arithmetic runs.
use crate::error::AccError;
use crate::group::Group;
use rug::integer::Order;
use rug::Integer;

/// Encoding relative to a group: widths and ranges depend on the modulus.
pub trait Codec<G: Group>: Sized {
  fn to_bytes(&self, group: &G) -> Result<Vec<u8>, AccError>;

  fn from_bytes(group: &G, bytes: &[u8]) -> Result<Self, AccError>;
}

/// Appends a non-negative integer as exactly `width` big-endian bytes.
pub(crate) fn write_uint(out: &mut Vec<u8>, x: &Integer, width: usize) -> Result<(), AccError> {
  if *x < 0 {
    return Err(AccError::ProofMalformed("negative integer field"));
  }
  let digits = x.to_digits::<u8>(Order::Msf);
  if digits.len() > width {
    return Err(AccError::ProofMalformed("integer field wider than the modulus"));
  }
  out.resize(out.len() + width - digits.len(), 0);
  out.extend_from_slice(&digits);
  Ok(())
}

/// Appends a non-negative integer of any size, prefixed with its byte length as a u32.
pub(crate) fn write_var_uint(out: &mut Vec<u8>, x: &Integer) -> Result<(), AccError> {
  if *x < 0 {
    return Err(AccError::ProofMalformed("negative integer field"));
  }
  let digits = x.to_digits::<u8>(Order::Msf);
  if digits.len() > u32::max_value() as usize {
    return Err(AccError::ProofMalformed("integer field too long"));
  }
  out.extend_from_slice(&(digits.len() as u32).to_be_bytes());
  out.extend_from_slice(&digits);
  Ok(())
}

pub(crate) fn write_elem<G: Group>(
  out: &mut Vec<u8>,
  group: &G,
  elem: &G::Elem,
) -> Result<(), AccError> {
  out.extend(group.elem_to_bytes(elem)?);
  Ok(())
}

/// Cursor over an encoded value.
pub(crate) struct Reader<'a> {
  bytes: &'a [u8],
  offset: usize,
}

impl<'a> Reader<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    Reader { bytes, offset: 0 }
  }

  pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], AccError> {
    if self.bytes.len() - self.offset < len {
      return Err(AccError::ProofMalformed("unexpected end of input"));
    }
    let start = self.offset;
    self.offset += len;
    Ok(&self.bytes[start..start + len])
  }

  pub fn read_uint(&mut self, width: usize) -> Result<Integer, AccError> {
    Ok(Integer::from_digits(self.read_exact(width)?, Order::Msf))
  }

  pub fn read_var_uint(&mut self) -> Result<Integer, AccError> {
    let len = u32::from_be_bytes(*array_ref![self.read_exact(4)?, 0, 4]) as usize;
    self.read_uint(len)
  }

  pub fn read_elem<G: Group>(&mut self, group: &G) -> Result<G::Elem, AccError> {
    group.elem_from_bytes(self.read_exact(group.elem_width())?)
  }

  pub fn read_u64(&mut self) -> Result<u64, AccError> {
    Ok(u64::from_be_bytes(*array_ref![self.read_exact(8)?, 0, 8]))
  }

  pub fn read_u8(&mut self) -> Result<u8, AccError> {
    Ok(self.read_exact(1)?[0])
  }

  /// Takes everything not read yet.
  pub fn rest(&mut self) -> &'a [u8] {
    let rest = &self.bytes[self.offset..];
    self.offset = self.bytes.len();
    rest
  }

  /// Fails if anything is left over.
  pub fn finish(self) -> Result<(), AccError> {
    if self.offset != self.bytes.len() {
      return Err(AccError::ProofMalformed("trailing bytes"));
    }
    Ok(())
  }
}
