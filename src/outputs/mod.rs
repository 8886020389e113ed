pub mod realizer;
