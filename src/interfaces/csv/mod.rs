pub mod card_reader;
pub mod result_writer;
