pub mod output;
pub mod rawseq;
pub mod rawseq_writer;
