pub mod sf2;
