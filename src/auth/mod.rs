// Authentication: password policy, hashing and bearer tokens

pub mod jwt;
pub mod password;
