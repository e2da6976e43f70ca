mod test_room_broadcasts;
mod test_room_switching;
