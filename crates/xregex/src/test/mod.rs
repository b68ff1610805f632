pub mod test_compile;
pub mod test_split;
pub mod test_tokens;
