pub mod data_generator;


#[cfg(test)]
mod metadata_errors;
