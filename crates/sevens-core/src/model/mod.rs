pub mod card;
pub mod deck;
pub mod hand;
pub mod player;
pub mod rank;
pub mod rules;
pub mod suit;
pub mod table;
