//! Checks for Brazilian identification numbers and phone numbers.
//!
//! Every function accepts formatted input (`"111.444.777-35"`,
//! `"11.222.333/0001-81"`, `"(11) 98765-4321"`): anything that is not an
//! ASCII digit is ignored.

const CPF_LENGTH: usize = 11;
const CNPJ_LENGTH: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Removes every character that is not an ASCII digit.
#[must_use]
pub fn only_digits(value: &str) -> String {
  value.chars().filter(char::is_ascii_digit).collect()
}

fn digits_of(value: &str) -> Vec<u8> {
  value
    .bytes()
    .filter(u8::is_ascii_digit)
    .map(|b| b - b'0')
    .collect()
}

fn all_equal(digits: &[u8]) -> bool {
  digits.windows(2).all(|w| w[0] == w[1])
}

// digits are at most 13 and check digits are below 10
#[allow(clippy::cast_possible_truncation)]
fn cpf_digit(digits: &[u8]) -> u8 {
  // weights run from `len + 1` down to 2
  let top = digits.len() as u32 + 1;
  let sum: u32 = digits
    .iter()
    .zip((2..=top).rev())
    .map(|(&d, w)| u32::from(d) * w)
    .sum();

  match 11 - sum % 11 {
    check if check >= 10 => 0,
    check => check as u8,
  }
}

#[allow(clippy::cast_possible_truncation)]
fn cnpj_digit(digits: &[u8], weights: &[u32]) -> u8 {
  let sum: u32 = digits
    .iter()
    .zip(weights)
    .map(|(&d, w)| u32::from(d) * w)
    .sum();

  match sum % 11 {
    rem if rem < 2 => 0,
    rem => (11 - rem) as u8,
  }
}

/// Computes both CPF check digits for a 9-digit base.
#[must_use]
pub fn cpf_check_digits(base: [u8; 9]) -> [u8; 2] {
  let first = cpf_digit(&base);

  let mut extended = [0u8; 10];
  extended[..9].copy_from_slice(&base);
  extended[9] = first;

  [first, cpf_digit(&extended)]
}

/// Computes both CNPJ check digits for a 12-digit base.
#[must_use]
pub fn cnpj_check_digits(base: [u8; 12]) -> [u8; 2] {
  let first = cnpj_digit(&base, &CNPJ_FIRST_WEIGHTS);

  let mut extended = [0u8; 13];
  extended[..12].copy_from_slice(&base);
  extended[12] = first;

  [first, cnpj_digit(&extended, &CNPJ_SECOND_WEIGHTS)]
}

#[must_use]
pub fn is_valid_cpf(value: &str) -> bool {
  let digits = digits_of(value);
  if digits.len() != CPF_LENGTH || all_equal(&digits) {
    return false;
  }

  let mut base = [0u8; 9];
  base.copy_from_slice(&digits[..9]);
  cpf_check_digits(base) == digits[9..]
}

#[must_use]
pub fn is_valid_cnpj(value: &str) -> bool {
  let digits = digits_of(value);
  if digits.len() != CNPJ_LENGTH || all_equal(&digits) {
    return false;
  }

  let mut base = [0u8; 12];
  base.copy_from_slice(&digits[..12]);
  cnpj_check_digits(base) == digits[12..]
}

/// Landline (10 digits) or mobile (11 digits) number, area code included.
#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
  matches!(digits_of(value).len(), 10 | 11)
}

#[cfg(test)]
mod tests {
  use super::*;

  // xorshift, good enough to spread bases across the number space
  struct Digits(u64);

  impl Digits {
    fn next(&mut self) -> u8 {
      self.0 ^= self.0 << 13;
      self.0 ^= self.0 >> 7;
      self.0 ^= self.0 << 17;
      (self.0 % 10) as u8
    }

    fn fill<const N: usize>(&mut self) -> [u8; N] {
      let mut out = [0u8; N];
      for d in &mut out {
        *d = self.next();
      }
      out
    }
  }

  fn render(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
  }

  fn generate_cpf(base: [u8; 9]) -> String {
    let mut digits = base.to_vec();
    digits.extend(cpf_check_digits(base));
    render(&digits)
  }

  fn generate_cnpj(base: [u8; 12]) -> String {
    let mut digits = base.to_vec();
    digits.extend(cnpj_check_digits(base));
    render(&digits)
  }

  // Counts how many single-digit substitutions still validate.
  fn surviving_mutations(valid: &str, check: fn(&str) -> bool) -> (usize, usize) {
    let mut total = 0;
    let mut survivors = 0;
    for position in 0..valid.len() {
      for replacement in b'0'..=b'9' {
        let mut bytes = valid.as_bytes().to_vec();
        if bytes[position] == replacement {
          continue;
        }
        bytes[position] = replacement;
        let mutated = String::from_utf8(bytes).unwrap();
        total += 1;
        if check(&mutated) {
          survivors += 1;
        }
      }
    }
    (total, survivors)
  }

  #[test]
  fn only_digits_is_idempotent() {
    let once = only_digits("111.444.777-35");
    assert_eq!(once, "11144477735");
    assert_eq!(only_digits(&once), once);
    assert_eq!(only_digits(""), "");
    assert_eq!(only_digits("(11) 9 8765-4321"), "11987654321");
  }

  #[test]
  fn known_cpfs() {
    assert!(is_valid_cpf("111.444.777-35"));
    assert!(is_valid_cpf("11144477735"));
    assert!(is_valid_cpf("529.982.247-25"));
    assert!(!is_valid_cpf("111.444.777-36"));
    assert!(!is_valid_cpf("1114447773"));
    assert!(!is_valid_cpf("111444777350"));
    assert!(!is_valid_cpf(""));
  }

  #[test]
  fn repeated_digits_are_never_valid() {
    for d in b'0'..=b'9' {
      let cpf = String::from_utf8(vec![d; 11]).unwrap();
      let cnpj = String::from_utf8(vec![d; 14]).unwrap();
      assert!(!is_valid_cpf(&cpf), "{cpf} must be rejected");
      assert!(!is_valid_cnpj(&cnpj), "{cnpj} must be rejected");
    }
  }

  #[test]
  fn generated_cpfs_validate() {
    let mut rng = Digits(0x2545_F491_4F6C_DD1D);
    for _ in 0..500 {
      let base = rng.fill::<9>();
      if all_equal(&base) {
        continue;
      }
      let cpf = generate_cpf(base);
      assert!(is_valid_cpf(&cpf), "{cpf} should be valid");
    }
  }

  #[test]
  fn cpf_mutations_are_rejected() {
    let mut rng = Digits(0x9E37_79B9_7F4A_7C15);
    let mut total = 0;
    let mut survivors = 0;
    for _ in 0..200 {
      let cpf = generate_cpf(rng.fill::<9>());
      let (t, s) = surviving_mutations(&cpf, is_valid_cpf);
      total += t;
      survivors += s;
    }
    assert!(survivors * 100 < total, "{survivors} of {total} mutations survived");
  }

  #[test]
  fn known_cnpjs() {
    assert!(is_valid_cnpj("11.222.333/0001-81"));
    assert!(is_valid_cnpj("11222333000181"));
    assert!(!is_valid_cnpj("11.222.333/0001-80"));
    assert!(!is_valid_cnpj("11.222.333/0001-8"));
    assert!(!is_valid_cnpj(""));
  }

  #[test]
  fn generated_cnpjs_validate() {
    let mut rng = Digits(0xD1B5_4A32_D192_ED03);
    for _ in 0..500 {
      let base = rng.fill::<12>();
      if all_equal(&base) {
        continue;
      }
      let cnpj = generate_cnpj(base);
      assert!(is_valid_cnpj(&cnpj), "{cnpj} should be valid");
    }
  }

  #[test]
  fn cnpj_mutations_are_rejected() {
    let mut rng = Digits(0x94D0_49BB_1331_11EB);
    let mut total = 0;
    let mut survivors = 0;
    for _ in 0..200 {
      let cnpj = generate_cnpj(rng.fill::<12>());
      let (t, s) = surviving_mutations(&cnpj, is_valid_cnpj);
      total += t;
      survivors += s;
    }
    assert!(survivors * 100 < total, "{survivors} of {total} mutations survived");
  }

  #[test]
  fn phones() {
    assert!(is_valid_phone("11987654321"));
    assert!(is_valid_phone("1198765432"));
    assert!(is_valid_phone("(11) 98765-4321"));
    assert!(!is_valid_phone("119876543"));
    assert!(!is_valid_phone("119876543210"));
  }
}
