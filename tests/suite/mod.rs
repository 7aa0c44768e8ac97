mod deck;
mod persistence;
mod sync;
