//! RSA group using rug's GMP integers. The modulus is a runtime value so that it can come out of an
//! external setup ceremony; its factorization must never be known to anyone using this crate.
use super::{Group, UnknownOrderGroup};
use crate::codec::write_uint;
use crate::error::AccError;
use crate::hash::primality::is_prob_prime;
use crate::util::int;
use log::error;
use rug::integer::Order;
use rug::Integer;
use std::sync::Arc;

/// RSA-2048 modulus, taken from https://en.wikipedia.org/wiki/RSA_numbers#RSA-2048.
const RSA2048_MODULUS_DECIMAL: &str = "25195908475657893494027183240048398571429282126204032027777\
                                       13783604366202070759555626401852588078440691829064124951508\
                                       21892985591491761845028084891200728449926873928072877767359\
                                       71418347270261896375014971824691165077613379859095700097330\
                                       45974880842840179742910064245869181719511874612151517265463\
                                       22822168699875491824224336372590851418654620435767984233871\
                                       84774447920739934236584823824281198163815010674810451660377\
                                       30605620161967625613384414360383390441495263443219011465754\
                                       44541784240209246165157233507787077498171257724679629263863\
                                       56373289912154831438167899885040445364023527381951378636564\
                                       391212010397122822120720357";

lazy_static! {
  pub static ref RSA2048_MODULUS: Integer = Integer::from(
    Integer::parse(RSA2048_MODULUS_DECIMAL).expect("RSA-2048 constant parses")
  );
  static ref RSA2048: Rsa = Rsa::from_parts(RSA2048_MODULUS.clone(), int(2));
}

#[derive(Debug)]
struct RsaParams {
  modulus: Integer,
  generator: Integer,
  width: usize,
}

/// Handle to an RSA group `Z_N^*`. Clones share the parameters.
#[derive(Clone, Debug)]
pub struct Rsa(Arc<RsaParams>);

/// An element of an RSA group, always in `[0, N)`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RsaElem(Integer);

impl RsaElem {
  pub fn as_integer(&self) -> &Integer {
    &self.0
  }
}

impl Rsa {
  /// Wraps an externally generated modulus and base after basic sanity checks. These cannot prove
  /// the order is hidden, only reject parameters that are obviously unusable.
  pub fn new(modulus: Integer, generator: Integer) -> Result<Self, AccError> {
    if modulus < 3 {
      return Err(AccError::InvalidModulus("modulus too small"));
    }
    if modulus.is_even() {
      return Err(AccError::InvalidModulus("modulus is even"));
    }
    if modulus.is_perfect_square() {
      return Err(AccError::InvalidModulus("modulus is a perfect square"));
    }
    if is_prob_prime(&modulus) {
      return Err(AccError::InvalidModulus("modulus is prime"));
    }
    if generator <= 1 || generator >= Integer::from(&modulus - 1) {
      return Err(AccError::InvalidModulus("generator out of range"));
    }
    if Integer::from(generator.gcd_ref(&modulus)) != 1 {
      return Err(AccError::InvalidModulus(
        "generator shares a factor with the modulus",
      ));
    }
    Ok(Self::from_parts(modulus, generator))
  }

  /// The RSA-2048 challenge modulus with base 2. Nobody is known to hold its factorization.
  pub fn rsa2048() -> Self {
    RSA2048.clone()
  }

  fn from_parts(modulus: Integer, generator: Integer) -> Self {
    let width = (modulus.significant_bits() as usize + 7) / 8;
    Rsa(Arc::new(RsaParams {
      modulus,
      generator,
      width,
    }))
  }

  pub fn modulus(&self) -> &Integer {
    &self.0.modulus
  }

  pub fn modulus_bits(&self) -> u32 {
    self.0.modulus.significant_bits()
  }

  /// Reduces any integer into the group.
  pub fn elem<T>(&self, t: T) -> RsaElem
  where
    Integer: From<T>,
  {
    let val = int(t) % self.modulus();
    if val < 0 {
      RsaElem(val + self.modulus())
    } else {
      RsaElem(val)
    }
  }
}

impl PartialEq for Rsa {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
      || (self.0.modulus == other.0.modulus && self.0.generator == other.0.generator)
  }
}

impl Eq for Rsa {}

impl Group for Rsa {
  type Elem = RsaElem;

  fn id(&self) -> RsaElem {
    RsaElem(int(1))
  }

  fn op(&self, a: &RsaElem, b: &RsaElem) -> RsaElem {
    RsaElem(Integer::from(&a.0 * &b.0) % self.modulus())
  }

  fn inv(&self, a: &RsaElem) -> Result<RsaElem, AccError> {
    match a.0.invert_ref(self.modulus()) {
      Some(inv) => Ok(RsaElem(Integer::from(inv))),
      None => {
        error!("group element is not invertible; the modulus may be compromised");
        Err(AccError::NotInvertible)
      }
    }
  }

  fn exp(&self, a: &RsaElem, n: &Integer) -> Result<RsaElem, AccError> {
    // Negative exponents go through the modular inverse inside GMP.
    match a.0.pow_mod_ref(n, self.modulus()) {
      Some(val) => Ok(RsaElem(Integer::from(val))),
      None => {
        error!("group element is not invertible; the modulus may be compromised");
        Err(AccError::NotInvertible)
      }
    }
  }

  fn elem_width(&self) -> usize {
    self.0.width
  }

  fn elem_to_bytes(&self, a: &RsaElem) -> Result<Vec<u8>, AccError> {
    if a.0 >= *self.modulus() {
      return Err(AccError::ProofMalformed("group element out of range"));
    }
    let mut out = Vec::with_capacity(self.0.width);
    write_uint(&mut out, &a.0, self.0.width)?;
    Ok(out)
  }

  fn elem_from_bytes(&self, bytes: &[u8]) -> Result<RsaElem, AccError> {
    if bytes.len() != self.0.width {
      return Err(AccError::ProofMalformed("group element has the wrong width"));
    }
    let val = Integer::from_digits(bytes, Order::Msf);
    if val >= *self.modulus() {
      return Err(AccError::ProofMalformed("group element out of range"));
    }
    Ok(RsaElem(val))
  }
}

impl UnknownOrderGroup for Rsa {
  fn unknown_order_elem(&self) -> RsaElem {
    RsaElem(self.0.generator.clone())
  }

  fn security_bits(&self) -> u32 {
    self.modulus_bits()
  }
}
