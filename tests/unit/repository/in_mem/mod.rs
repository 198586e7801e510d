mod cart;
